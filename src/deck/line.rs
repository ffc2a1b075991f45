//! Deck file line grammar.
//!
//! A deck file is line oriented:
//!
//! ```text
//! [metadata]
//! Name=Elves
//! [Main]
//! 4 Llanowar Elves|M19
//! 20 Forest|M19|2
//! [Sideboard]
//! 2 Naturalize|M19
//! ```
//!
//! Bracketed lines are section headers. Card lines are
//! `<quantity> <name>|<set code>[|extra...]`.

/// Section header name that holds free-form key/value lines.
pub const METADATA_SECTION: &str = "metadata";

/// A parsed card line, borrowing from the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLine<'a> {
    pub quantity: u32,
    /// Quantity as written, e.g. `04` or `+4`.
    pub quantity_text: &'a str,
    pub name: &'a str,
    pub set_code: &'a str,
    /// Everything after the set code, without the leading `|`.
    pub extra: Option<&'a str>,
}

impl<'a> CardLine<'a> {
    /// Parse `<quantity> <name>|<set>[|extra]`.
    ///
    /// Returns `None` when the quantity is not a number, the name is empty,
    /// or the set code field is missing.
    ///
    /// ```
    /// use ccg_remap::deck::CardLine;
    ///
    /// let line = CardLine::parse("4 Lightning Bolt|M10|1").unwrap();
    /// assert_eq!(line.quantity, 4);
    /// assert_eq!(line.name, "Lightning Bolt");
    /// assert_eq!(line.set_code, "M10");
    /// assert_eq!(line.extra, Some("1"));
    ///
    /// assert!(CardLine::parse("Lightning Bolt|M10").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let (quantity_text, info) = line.trim().split_once(' ')?;
        let quantity = quantity_text.parse().ok()?;

        let mut fields = info.splitn(3, '|');
        let name = fields.next()?.trim();
        let set_code = fields.next()?.trim();
        let extra = fields.next();

        if name.is_empty() {
            return None;
        }
        Some(Self { quantity, quantity_text, name, set_code, extra })
    }
}

/// Section name if `line` is a bracketed header.
///
/// ```
/// use ccg_remap::deck::section_header;
///
/// assert_eq!(section_header("[Main]"), Some("Main"));
/// assert_eq!(section_header("4 Forest|LTR"), None);
/// ```
#[must_use]
pub fn section_header(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

/// Card names referenced anywhere in a deck file, in order of appearance.
///
/// Looser than `CardLine::parse`: any line starting with a digit and
/// containing `|` counts, which is what a catalog fetch needs.
#[must_use]
pub fn referenced_names(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()) && line.contains('|'))
        .filter_map(|line| line.split_once(' '))
        .filter_map(|(_, info)| info.split('|').next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
