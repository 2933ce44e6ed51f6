use crate::fonts::FontFace;

/// Greedy word wrap of `text` into lines no wider than `max_width`.
///
/// Each `\n` starts a new paragraph; a paragraph always yields at least one
/// line, even when empty. A word wider than the whole line is broken between
/// characters.
pub(crate) fn wrap_text(text: &str, face: &FontFace, font_size: f32, max_width: f32) -> Vec<String> {
    let space_w = face.space_width(font_size);
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_x: f32 = 0.0;

        for word in paragraph.split_whitespace() {
            let ww = face.word_width(word, font_size);
            let proposed_x = if current.is_empty() {
                0.0
            } else {
                current_x + space_w
            };

            if proposed_x + ww <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_x = proposed_x + ww;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_x = 0.0;
            }

            if ww <= max_width {
                current.push_str(word);
                current_x = ww;
                continue;
            }

            // Longer than a full line: fill lines character by character.
            for ch in word.chars() {
                let cw = face.char_width_1000(ch) * font_size / 1000.0;
                if !current.is_empty() && current_x + cw > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_x = 0.0;
                }
                current.push(ch);
                current_x += cw;
            }
        }

        lines.push(current);
    }

    lines
}
