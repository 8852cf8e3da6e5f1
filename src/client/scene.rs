use super::view::ClientView;

/// How far above its avatar a speech bubble is anchored, in world units
pub const BUBBLE_LIFT: f64 = 20.0;

/// One thing to draw, in world coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Avatar {
        id: String,
        x: f64,
        y: f64,
        is_self: bool,
    },
    Bubble {
        id: String,
        x: f64,
        y: f64,
        text: String,
    },
}

/// Draw list for one frame. Avatars come first so bubbles land on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn build(view: &ClientView) -> Self {
        let participants = view.participants();

        let avatars = participants.iter().map(|p| Primitive::Avatar {
            id: p.id.clone(),
            x: p.x,
            y: p.y,
            is_self: view.is_self(&p.id),
        });

        let bubbles = participants
            .iter()
            .filter(|p| p.sent_message && !p.current_message.is_empty())
            .map(|p| Primitive::Bubble {
                id: p.id.clone(),
                x: p.x,
                y: p.y - BUBBLE_LIFT,
                text: p.current_message.clone(),
            });

        Self {
            primitives: avatars.chain(bubbles).collect(),
        }
    }
}
