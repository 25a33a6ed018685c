//! Token classes and the Nemo highlighting theme.

use std::collections::HashMap;

/// Visual class of a highlighted token.
///
/// The discriminants follow the token-type codes the Nemo language server
/// sends; [`TokenClass::from_code`] is the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Type,
    Variable,
    String,
    Keyword,
    Number,
    Atom,
    Property,
    Operator,
    Comment,
    /// Fallback for codes outside the table.
    Default,
}

impl TokenClass {
    /// Number of codes in the wire table.
    pub const CODE_COUNT: u32 = 10;

    /// Maps a token-type code to its class. Unknown codes map to
    /// [`TokenClass::Default`].
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::Type,
            1 => Self::Variable,
            2 => Self::String,
            3 => Self::Keyword,
            // Integers and floats share a class.
            4 | 5 => Self::Number,
            6 => Self::Atom,
            7 => Self::Property,
            8 => Self::Operator,
            9 => Self::Comment,
            _ => Self::Default,
        }
    }

    /// The CSS class the editor renders for this token.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Type => "cm-type",
            Self::Variable => "cm-variable",
            Self::String => "cm-string",
            Self::Keyword => "cm-keyword",
            Self::Number => "cm-number",
            Self::Atom => "cm-atom",
            Self::Property => "cm-property",
            Self::Operator => "cm-operator",
            Self::Comment => "cm-comment",
            Self::Default => "cm-default",
        }
    }
}

/// RGBA color represented as [r, g, b, a] with values 0.0-1.0.
pub type Color = [f32; 4];

/// Style applied to one token class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenStyle {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl TokenStyle {
    pub fn plain(color: Color) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
        }
    }
}

/// A highlighting theme installed alongside the decoration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Color used for classes without a style.
    pub foreground: Color,
    styles: HashMap<TokenClass, TokenStyle>,
}

impl Theme {
    /// Creates a theme with no class styles.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            foreground: [0.0, 0.0, 0.0, 1.0],
            styles: HashMap::new(),
        }
    }

    /// Sets the style for a token class.
    pub fn set_style(&mut self, class: TokenClass, style: TokenStyle) {
        self.styles.insert(class, style);
    }

    /// Gets the style for a token class, falling back to the foreground.
    pub fn style(&self, class: TokenClass) -> TokenStyle {
        self.styles
            .get(&class)
            .copied()
            .unwrap_or(TokenStyle::plain(self.foreground))
    }

    /// Returns true if the class has its own style.
    pub fn has_style(&self, class: TokenClass) -> bool {
        self.styles.contains_key(&class)
    }

    /// The base theme shipped with the Nemo notebook extension.
    pub fn nemo() -> Self {
        let mut theme = Self::new("Nemo");

        theme.set_style(
            TokenClass::Keyword,
            TokenStyle {
                color: [0.0, 0.0, 1.0, 1.0], // blue
                bold: true,
                italic: false,
            },
        );
        theme.set_style(TokenClass::Variable, TokenStyle::plain([0.0, 0.0, 0.0, 1.0])); // black
        theme.set_style(TokenClass::String, TokenStyle::plain([0.0, 0.502, 0.0, 1.0])); // green
        theme.set_style(TokenClass::Number, TokenStyle::plain([1.0, 0.0, 0.0, 1.0])); // red
        theme.set_style(TokenClass::Operator, TokenStyle::plain([0.502, 0.0, 0.502, 1.0])); // purple
        theme.set_style(
            TokenClass::Comment,
            TokenStyle {
                color: [0.502, 0.502, 0.502, 1.0], // gray
                bold: false,
                italic: true,
            },
        );

        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::nemo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table() {
        let classes: Vec<&str> = (0..TokenClass::CODE_COUNT)
            .map(|code| TokenClass::from_code(code).css_class())
            .collect();
        assert_eq!(
            classes,
            vec![
                "cm-type",
                "cm-variable",
                "cm-string",
                "cm-keyword",
                "cm-number",
                "cm-number",
                "cm-atom",
                "cm-property",
                "cm-operator",
                "cm-comment",
            ]
        );
    }

    #[test]
    fn test_unknown_code_is_default() {
        assert_eq!(TokenClass::from_code(42), TokenClass::Default);
        assert_eq!(TokenClass::from_code(u32::MAX).css_class(), "cm-default");
    }

    #[test]
    fn test_nemo_theme() {
        let theme = Theme::nemo();
        let keyword = theme.style(TokenClass::Keyword);
        assert!(keyword.bold);
        assert!(theme.style(TokenClass::Comment).italic);
        assert_ne!(keyword.color, theme.style(TokenClass::Number).color);
    }

    #[test]
    fn test_fallback_style() {
        let theme = Theme::nemo();
        // Atoms are not styled by the base theme.
        assert!(!theme.has_style(TokenClass::Atom));
        assert_eq!(theme.style(TokenClass::Atom), TokenStyle::plain(theme.foreground));
    }
}
