//! Char-indexed editing on a string with a cursor. Cursors past the end are
//! treated as sitting at the end.

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn byte_offset(value: &str, cursor: usize) -> usize {
    value
        .char_indices()
        .map(|(offset, _)| offset)
        .nth(cursor)
        .unwrap_or(value.len())
}

pub fn insert_char(value: &mut String, cursor: &mut usize, ch: char) {
    let at = (*cursor).min(char_count(value));
    value.insert(byte_offset(value, at), ch);
    *cursor = at + 1;
}

/// Removes the char before the cursor. Returns false at the start.
pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let at = (*cursor).min(char_count(value));
    let Some(target) = at.checked_sub(1) else {
        return false;
    };
    value.remove(byte_offset(value, target));
    *cursor = target;
    true
}

/// Removes the char under the cursor. Returns false at the end.
pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let at = (*cursor).min(char_count(value));
    if at == char_count(value) {
        return false;
    }
    value.remove(byte_offset(value, at));
    *cursor = at;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    match (*cursor).min(char_count(value)).checked_sub(1) {
        Some(next) => {
            *cursor = next;
            true
        }
        None => false,
    }
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let len = char_count(value);
    if *cursor >= len {
        *cursor = len;
        return false;
    }
    *cursor += 1;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_track_cursor() {
        let mut value = String::from("2024-02");
        let mut cursor = 4;
        insert_char(&mut value, &mut cursor, '/');
        assert_eq!(value, "2024/-02");
        assert_eq!(cursor, 5);

        assert!(backspace_char(&mut value, &mut cursor));
        assert_eq!(value, "2024-02");
        assert_eq!(cursor, 4);
    }

    #[test]
    fn delete_at_end_is_noop() {
        let mut value = String::from("ab");
        let mut cursor = 2;
        assert!(!delete_char(&mut value, &mut cursor));
        cursor = 0;
        assert!(delete_char(&mut value, &mut cursor));
        assert_eq!(value, "b");
    }

    #[test]
    fn cursor_moves_are_clamped() {
        let mut cursor = 0;
        assert!(!move_left(&mut cursor, "ab"));
        assert!(move_right(&mut cursor, "ab"));
        assert!(move_right(&mut cursor, "ab"));
        assert!(!move_right(&mut cursor, "ab"));
        assert_eq!(cursor, 2);
    }
}
