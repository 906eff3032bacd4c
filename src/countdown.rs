use timer_core::{parse_field, DurationField, PendingDuration};

/// Cursor and typed-digit buffer for the countdown duration wheels.
pub struct CountdownEditor {
    pub cursor: DurationField,
    typed: String,
}

impl CountdownEditor {
    pub fn new() -> Self {
        Self {
            cursor: DurationField::Minutes,
            typed: String::new(),
        }
    }

    pub fn move_right(&mut self) {
        self.cursor = self.cursor.next();
        self.typed.clear();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.prev();
        self.typed.clear();
    }

    pub fn clear_typed(&mut self) {
        self.typed.clear();
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    /// Feed one typed character into the selected field and return the
    /// updated duration. Two characters complete a field and move the cursor.
    pub fn type_char(&mut self, c: char, pending: &PendingDuration) -> PendingDuration {
        let field = self.cursor;
        self.typed.push(c);
        let mut updated = *pending;
        updated.set(field, parse_field(&self.typed, field.max()));
        if self.typed.len() >= 2 {
            self.typed.clear();
            self.cursor = field.next();
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_fills_fields() {
        let mut ed = CountdownEditor::new();
        let p = PendingDuration::new(0, 0, 0);

        let p = ed.type_char('4', &p);
        assert_eq!(p.minutes, 4);
        assert_eq!(ed.typed(), "4");
        let p = ed.type_char('5', &p);
        assert_eq!(p.minutes, 45);
        assert_eq!(ed.cursor, DurationField::Seconds);

        let p = ed.type_char('9', &p);
        let p = ed.type_char('9', &p);
        assert_eq!(p.seconds, 59);
        assert_eq!(ed.cursor, DurationField::Hours);
    }

    #[test]
    fn test_cursor_moves_reset_buffer() {
        let mut ed = CountdownEditor::new();
        let p = ed.type_char('1', &PendingDuration::default());
        assert_eq!(p.minutes, 1);
        ed.move_left();
        assert_eq!(ed.cursor, DurationField::Hours);
        assert_eq!(ed.typed(), "");
        ed.move_right();
        ed.move_right();
        assert_eq!(ed.cursor, DurationField::Seconds);
    }
}
