//! Draw-command surface for render passes.
//!
//! Animations never touch a GPU or a window. They append retained draw
//! commands to a [`DrawList`] the render pass hands in; batching, atlases
//! and actual submission live on the other side of this boundary.

/// A single retained draw command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Textured sprite from the caller's atlas.
    Sprite {
        /// Sprite ID in the caller's atlas.
        sprite: u32,
        /// Center X in world units.
        x: f32,
        /// Center Y in world units.
        y: f32,
        /// Uniform scale factor.
        scale: f32,
        /// Opacity (0 transparent, 1 opaque).
        opacity: f32,
    },
    /// Filled rectangle.
    Rect {
        /// Left edge in world units.
        x: f32,
        /// Top edge in world units.
        y: f32,
        /// Width in world units.
        width: f32,
        /// Height in world units.
        height: f32,
        /// Fill color (RGBA, 0-1).
        color: [f32; 4],
    },
    /// Floating text (damage numbers, gold popups).
    Text {
        /// Text content.
        text: String,
        /// Baseline X in world units.
        x: f32,
        /// Baseline Y in world units.
        y: f32,
        /// Text color (RGBA, 0-1).
        color: [f32; 4],
    },
}

/// Per-frame command sink filled by one render pass.
#[derive(Debug)]
pub struct DrawList {
    /// Recorded commands, in submission order.
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list with room for a typical frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
        }
    }

    /// Appends one command.
    #[inline]
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Commands recorded so far, in submission order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Clears the list for the next frame, keeping capacity.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut list = DrawList::new();
        assert!(list.is_empty());

        list.push(DrawCommand::Sprite {
            sprite: 7,
            x: 1.0,
            y: 2.0,
            scale: 1.0,
            opacity: 0.5,
        });
        list.push(DrawCommand::Rect {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 4.0,
            color: [1.0, 0.0, 0.0, 1.0],
        });

        assert_eq!(list.len(), 2);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::Sprite { sprite: 7, .. }
        ));

        list.clear();
        assert!(list.is_empty());
    }
}
