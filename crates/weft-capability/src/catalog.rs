//! The standard capability catalog.
//!
//! Seeded into every [`CapabilityRegistry`](crate::CapabilityRegistry)
//! at construction. Custom capabilities declared by widget manifests
//! extend this set at registration time.
//!
//! | Domain | Input | Output | Entity tags |
//! |--------|-------|--------|-------------|
//! | text | `text.set` | `text.changed` | text |
//! | color | `color.set` | `color.changed` | color, visual |
//! | number | `number.set` | `number.changed` | number |
//! | trigger | `trigger.fire` | `trigger.fired` | control |
//! | audio | `audio.play` | `audio.beat` | audio, media |
//! | media | `media.load` | `media.loaded` | media, visual |
//! | data | `data.set` | `data.changed` | data |

use crate::definition::{CapabilityDefinition, Direction, PayloadField};

fn capability(
    id: &str,
    name: &str,
    description: &str,
    direction: Direction,
    payload: Vec<PayloadField>,
    entity_types: &[&str],
) -> CapabilityDefinition {
    CapabilityDefinition {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        direction,
        payload,
        entity_types: entity_types.iter().map(|s| s.to_string()).collect(),
    }
}

/// Returns the standard capabilities, input/output pairs per domain.
#[must_use]
pub fn standard_capabilities() -> Vec<CapabilityDefinition> {
    use Direction::{Input, Output};

    vec![
        capability(
            "text.set",
            "Set Text",
            "Replace the widget's text content",
            Input,
            vec![PayloadField::required("value", "string")],
            &["text"],
        ),
        capability(
            "text.changed",
            "Text Changed",
            "The widget's text content changed",
            Output,
            vec![PayloadField::required("value", "string")],
            &["text"],
        ),
        capability(
            "color.set",
            "Set Color",
            "Apply a color value",
            Input,
            vec![PayloadField::required("value", "string")],
            &["color", "visual"],
        ),
        capability(
            "color.changed",
            "Color Changed",
            "The widget's color changed",
            Output,
            vec![PayloadField::required("value", "string")],
            &["color", "visual"],
        ),
        capability(
            "number.set",
            "Set Number",
            "Apply a numeric value",
            Input,
            vec![PayloadField::required("value", "number")],
            &["number"],
        ),
        capability(
            "number.changed",
            "Number Changed",
            "The widget's numeric value changed",
            Output,
            vec![PayloadField::required("value", "number")],
            &["number"],
        ),
        capability(
            "trigger.fire",
            "Fire Trigger",
            "Activate the widget once",
            Input,
            vec![],
            &["control"],
        ),
        capability(
            "trigger.fired",
            "Trigger Fired",
            "The widget was activated",
            Output,
            vec![],
            &["control"],
        ),
        capability(
            "audio.play",
            "Play Audio",
            "Start audio playback",
            Input,
            vec![PayloadField::optional("url", "string")],
            &["audio", "media"],
        ),
        capability(
            "audio.beat",
            "Beat Detected",
            "A beat was detected in the audio stream",
            Output,
            vec![
                PayloadField::optional("bpm", "number"),
                PayloadField::optional("intensity", "number"),
            ],
            &["audio"],
        ),
        capability(
            "media.load",
            "Load Media",
            "Load a media resource by URL",
            Input,
            vec![PayloadField::required("url", "string")],
            &["media", "visual"],
        ),
        capability(
            "media.loaded",
            "Media Loaded",
            "A media resource finished loading",
            Output,
            vec![PayloadField::required("url", "string")],
            &["media", "visual"],
        ),
        capability(
            "data.set",
            "Set Data",
            "Replace the widget's data record",
            Input,
            vec![PayloadField::required("data", "object")],
            &["data"],
        ),
        capability(
            "data.changed",
            "Data Changed",
            "The widget's data record changed",
            Output,
            vec![PayloadField::required("data", "object")],
            &["data"],
        ),
    ]
}
