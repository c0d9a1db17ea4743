use px_core::Point2f;

/// Receiver for straight-line glyph outlines, in font units with y up.
pub trait GlyphPen {
    /// Start a new contour at the given point.
    fn move_to(&mut self, x: f32, y: f32);
    /// Draw a straight line to the given point.
    fn line_to(&mut self, x: f32, y: f32);
    /// Close the current contour back to its start.
    fn close_path(&mut self);
}

impl<P: GlyphPen + ?Sized> GlyphPen for &mut P {
    fn move_to(&mut self, x: f32, y: f32) {
        (**self).move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        (**self).line_to(x, y);
    }

    fn close_path(&mut self) {
        (**self).close_path();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PenCommand {
    MoveTo(Point2f),
    LineTo(Point2f),
    ClosePath,
}

/// Pen that keeps every command it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPen {
    pub commands: Vec<PenCommand>,
}

impl RecordingPen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of closed contours drawn so far.
    pub fn num_closed(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PenCommand::ClosePath))
            .count()
    }
}

impl GlyphPen for RecordingPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(PenCommand::MoveTo(Point2f { x, y }));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(PenCommand::LineTo(Point2f { x, y }));
    }

    fn close_path(&mut self) {
        self.commands.push(PenCommand::ClosePath);
    }
}
