use serde_json::Value;

use crate::encoding::{self, ImagePreview};

/// Relay endpoints and the image fields each one recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Garment photo plus an optional model photo
    AiPhotoshoot,
    /// Garment photo plus the shopper's own photo
    VirtualTryOn,
}

/// One logical image slot in a request body
///
/// Clients disagree on naming, so a slot can have several spellings. The
/// first spelling holding a non-empty string is the one that gets normalized.
#[derive(Debug)]
pub struct ImageField {
    pub aliases: &'static [&'static str],
}

const GARMENT: ImageField = ImageField {
    aliases: &["garment_image"],
};

const MODEL: ImageField = ImageField {
    aliases: &["model_image"],
};

const PERSON: ImageField = ImageField {
    aliases: &["user_image", "person_image"],
};

const PHOTOSHOOT_FIELDS: &[ImageField] = &[GARMENT, MODEL];

const TRYON_FIELDS: &[ImageField] = &[GARMENT, PERSON];

impl Operation {
    pub const ALL: [Self; 2] = [Self::AiPhotoshoot, Self::VirtualTryOn];

    /// Route the operation is served on
    pub const fn path(self) -> &'static str {
        match self {
            Self::AiPhotoshoot => "/api/ai-photoshoot",
            Self::VirtualTryOn => "/api/virtual-tryon",
        }
    }

    /// Short name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::AiPhotoshoot => "ai_photoshoot",
            Self::VirtualTryOn => "virtual_tryon",
        }
    }

    pub const fn image_fields(self) -> &'static [ImageField] {
        match self {
            Self::AiPhotoshoot => PHOTOSHOOT_FIELDS,
            Self::VirtualTryOn => TRYON_FIELDS,
        }
    }

    /// Normalize every recognized image field of `payload` in place
    ///
    /// Returns the field names that were rewritten with a preview of their
    /// new value. Non-object payloads and absent, empty, or non-string
    /// fields are left untouched.
    pub fn sanitize(self, payload: &mut Value) -> Vec<(&'static str, ImagePreview)> {
        let Some(object) = payload.as_object_mut() else {
            return Vec::new();
        };

        let mut sanitized = Vec::new();

        for field in self.image_fields() {
            let chosen = field
                .aliases
                .iter()
                .copied()
                .find(|alias| object.get(*alias).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));

            let Some(alias) = chosen else {
                continue;
            };

            if let Some(slot) = object.get_mut(alias)
                && let Some(raw) = slot.as_str()
            {
                let normalized = encoding::normalize(raw);
                sanitized.push((alias, ImagePreview::of(&normalized)));
                *slot = Value::String(normalized);
            }
        }

        sanitized
    }
}
