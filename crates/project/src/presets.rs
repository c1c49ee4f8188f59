//! Quick-fill options for prompt metadata.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    BaseStyle,
    Environment,
    Camera,
    AspectRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub value: &'static str,
}

const fn preset(name: &'static str, value: &'static str) -> Preset {
    Preset { name, value }
}

pub const ASPECT_RATIOS: &[Preset] = &[
    preset("16:9", "16:9 (Recommended)"),
    preset("9:16", "9:16 (Vertical)"),
    preset("1:1", "1:1 (Square)"),
    preset("4:3", "4:3 (Traditional)"),
    preset("21:9", "21:9 (Ultrawide)"),
    preset("3:2", "3:2 (Classic)"),
    preset("5:4", "5:4 (Portrait)"),
];

pub const BASE_STYLES: &[Preset] = &[
    preset("Cinematic", "cinematic, photorealistic, 4K, film grain, dramatic lighting"),
    preset("Documentary", "documentary style, natural lighting, handheld camera feel, realistic"),
    preset("Commercial", "commercial photography, clean, bright, professional lighting, high contrast"),
    preset("Artistic", "artistic, creative composition, unique angles, stylized, moody lighting"),
    preset("Corporate", "corporate, professional, clean backgrounds, even lighting, business style"),
    preset("Vintage", "vintage, retro, film aesthetic, warm tones, nostalgic feel"),
    preset("Modern", "modern, sleek, minimalist, contemporary design, crisp details"),
    preset("Dramatic", "dramatic lighting, high contrast, intense shadows, cinematic mood"),
    preset("Natural", "natural lighting, soft shadows, realistic colors, authentic feel"),
    preset("High-End", "luxury, premium quality, perfect lighting, ultra-detailed, pristine"),
];

pub const ENVIRONMENTS: &[Preset] = &[
    preset("Modern Office", "A sleek modern office space with glass windows, minimalist furniture, and clean lines. Natural light streaming through large windows."),
    preset("Cozy Living Room", "A warm, inviting living room with comfortable furniture, soft lighting, and personal touches like books and plants."),
    preset("Industrial Kitchen", "A professional-grade kitchen with stainless steel appliances, marble countertops, and excellent task lighting."),
    preset("Outdoor Garden", "A lush garden setting with vibrant flowers, green foliage, and natural sunlight filtering through trees."),
    preset("Urban Street", "A bustling city street with modern architecture, pedestrians, and urban elements like streetlights and storefronts."),
    preset("Beach Setting", "A pristine beach environment with golden sand, clear blue water, and natural coastal lighting."),
    preset("Forest Path", "A serene forest trail surrounded by tall trees, dappled sunlight, and natural woodland atmosphere."),
    preset("Corporate Boardroom", "A professional boardroom with a large conference table, executive chairs, and sophisticated lighting."),
    preset("Art Studio", "A creative artist's studio with easels, canvases, art supplies, and natural light from skylights."),
    preset("Warehouse Space", "A spacious industrial warehouse with high ceilings, concrete floors, and dramatic overhead lighting."),
];

pub const CAMERA_SETUPS: &[Preset] = &[
    preset("Static Wide", "A single, fixed, wide-angle shot. The camera does not move for the entire duration."),
    preset("Dolly In", "Camera starts wide and slowly dollies in towards the subject for dramatic effect."),
    preset("Tracking Shot", "Camera smoothly tracks alongside the subject as they move through the scene."),
    preset("Aerial View", "Top-down aerial shot providing a bird's-eye perspective of the entire scene."),
    preset("POV Shot", "First-person perspective as if seeing through the character's eyes."),
    preset("Close-up Focus", "Tight close-up shot focusing on specific details with shallow depth of field."),
    preset("Pan L-R", "Camera pans horizontally from left to right across the scene."),
    preset("Low Angle", "Low-angle shot looking up at the subject to create an imposing, heroic feel."),
    preset("Handheld", "Handheld, slightly shaky camera movement for a raw, documentary-style feel."),
    preset("Steadicam Circle", "Smooth Steadicam movement circling around the central subject."),
];

pub fn presets_for(kind: PresetKind) -> &'static [Preset] {
    match kind {
        PresetKind::BaseStyle => BASE_STYLES,
        PresetKind::Environment => ENVIRONMENTS,
        PresetKind::Camera => CAMERA_SETUPS,
        PresetKind::AspectRatio => ASPECT_RATIOS,
    }
}

/// Value stored in the metadata field for the named preset.
/// Aspect ratios store their name.
pub fn find(kind: PresetKind, name: &str) -> Option<&'static str> {
    let found = presets_for(kind)
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name.trim()))?;
    Some(match kind {
        PresetKind::AspectRatio => found.name,
        _ => found.value,
    })
}
