//! Inline keyboard builders for interactive prompts
//!
//! Every button of a prompt carries the callback ID the prompt was
//! registered under, followed by a token telling the handler which button
//! was pressed.

use crate::constants::token;
use crate::types::Locations;

/// Single inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// Opaque data sent back when the button is pressed
    pub data: String,
}

impl Button {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

/// Grid of inline buttons, row by row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<Button>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }
}

/// Create the "where should it go" keyboard of the add-torrent prompt
///
/// # Arguments
/// * `id` - Callback ID of the prompt
/// * `locations` - Configured locations, one button each, in order
///
/// # Returns
/// Location buttons plus "Other" on the first row, "Cancel" on the second
pub fn location_keyboard(id: &str, locations: &Locations) -> InlineKeyboard {
    let mut row: Vec<Button> = locations
        .iter()
        .map(|l| Button::callback(l.name.as_str(), format!("{}{}", id, l.name)))
        .collect();
    row.push(Button::callback("Other", format!("{}{}", id, token::OTHER)));

    InlineKeyboard::new(vec![
        row,
        vec![Button::callback("Cancel", format!("{}{}", id, token::CANCEL))],
    ])
}

/// Create a confirmation keyboard for torrent removal
///
/// "Yes" removes torrents together with their data, "No" keeps the data.
pub fn removal_keyboard(id: &str) -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![
        Button::callback("Yes", format!("{}{}", id, token::YES)),
        Button::callback("No", format!("{}{}", id, token::NO)),
        Button::callback("Cancel", format!("{}{}", id, token::CANCEL)),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    #[test]
    fn test_location_keyboard_keeps_order() {
        let locations = Locations::new(vec![
            Location::new("movies", "/data/movies"),
            Location::new("books", "/data/books"),
        ]);

        let kb = location_keyboard("ID-", &locations);
        assert_eq!(
            kb.rows,
            vec![
                vec![
                    Button::callback("movies", "ID-movies"),
                    Button::callback("books", "ID-books"),
                    Button::callback("Other", "ID-other"),
                ],
                vec![Button::callback("Cancel", "ID-cancel")],
            ]
        );
    }

    #[test]
    fn test_removal_keyboard() {
        let kb = removal_keyboard("X");
        let data: Vec<&str> = kb.rows[0].iter().map(|b| b.data.as_str()).collect();
        assert_eq!(data, ["Xyes", "Xno", "Xcancel"]);
    }
}
