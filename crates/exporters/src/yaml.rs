use crate::{filtered_metadata, timeline_entries};
use project::PromptDocument;

/// Double-quoted YAML scalar.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn push_list(yaml: &mut String, key: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    yaml.push_str(&format!("  {}:\n", key));
    for item in items {
        yaml.push_str(&format!("    - {}\n", quote(item)));
    }
}

/// Render a prompt document in the prompt YAML layout: a `metadata`
/// block followed by a `timeline` list.
pub fn render_yaml(doc: &PromptDocument) -> String {
    let meta = filtered_metadata(&doc.metadata);
    let mut yaml = String::from("metadata:\n");

    yaml.push_str(&format!("  prompt_name: {}\n", quote(&meta.prompt_name)));
    yaml.push_str(&format!("  base_style: {}\n", quote(&meta.base_style)));
    yaml.push_str(&format!("  aspect_ratio: {}\n", quote(&meta.aspect_ratio)));
    yaml.push_str(&format!(
        "  environment_description: {}\n",
        quote(&meta.room_description)
    ));
    yaml.push_str(&format!("  camera_setup: {}\n", quote(&meta.camera_setup)));

    push_list(&mut yaml, "key_elements", &meta.key_elements);
    for (name, items) in &meta.element_categories {
        push_list(&mut yaml, name, items);
    }
    push_list(&mut yaml, "negative_prompts", &meta.negative_prompts);

    yaml.push_str("\ntimeline:\n");
    for entry in timeline_entries(&doc.sequences) {
        yaml.push_str(&format!("  - sequence: {}\n", entry.sequence));
        yaml.push_str(&format!("    timestamp: {}\n", quote(&entry.timestamp)));
        yaml.push_str(&format!("    action: {}\n", quote(&entry.action)));
        yaml.push_str(&format!("    audio: {}\n\n", quote(&entry.audio)));
    }

    yaml
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline::TimelineCommand;

    #[test]
    fn test_default_document_yaml() {
        let yaml = render_yaml(&PromptDocument::default());
        let expected = "metadata:\n  prompt_name: \"\"\n  base_style: \"cinematic, photorealistic, 4K\"\n  aspect_ratio: \"16:9\"\n  environment_description: \"\"\n  camera_setup: \"\"\n\ntimeline:\n  - sequence: 1\n    timestamp: \"00:00-00:01\"\n    action: \"\"\n    audio: \"\"\n\n";
        assert_eq!(yaml, expected);
    }

    #[test]
    fn test_lists_and_categories_in_order() {
        let mut doc = PromptDocument::default();
        doc.metadata.prompt_name = "Cafe".into();
        doc.metadata.key_elements = vec!["coffee cup".into(), " ".into()];
        doc.metadata.add_category("Wardrobe");
        doc.metadata.add_category("Empty One");
        doc.metadata.push_category_item("wardrobe");
        doc.metadata.set_category_item("wardrobe", 0, "red scarf");
        doc.metadata.negative_prompts = vec!["blurry".into()];

        let yaml = render_yaml(&doc);

        let key_pos = yaml.find("  key_elements:\n    - \"coffee cup\"\n").unwrap();
        let cat_pos = yaml.find("  wardrobe:\n    - \"red scarf\"\n").unwrap();
        let neg_pos = yaml.find("  negative_prompts:\n    - \"blurry\"\n").unwrap();
        assert!(key_pos < cat_pos && cat_pos < neg_pos);
        assert!(!yaml.contains("empty_one"));
        assert_eq!(yaml.matches("    - ").count(), 3);
    }

    #[test]
    fn test_timeline_entries_follow_reflow() {
        let mut doc = PromptDocument::default();
        doc.apply(&TimelineCommand::Append);
        doc.apply(&TimelineCommand::Append);
        doc.apply(&TimelineCommand::SetDuration {
            position: 1,
            duration: 5,
        });

        let yaml = render_yaml(&doc);
        assert!(yaml.contains("  - sequence: 2\n    timestamp: \"00:01-00:06\"\n"));
        assert!(yaml.contains("  - sequence: 3\n    timestamp: \"00:06-00:07\"\n"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("line1\nline2"), "\"line1\\nline2\"");
    }
}
