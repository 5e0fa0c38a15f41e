/// Knobs shared by the document reader and the renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    /// Pretty-print XML and JSON output.
    indent: bool,
    /// Warn about every invalid item once a document has been parsed.
    validate_items: bool,
    /// Freeze the model as soon as the document reader is done with it.
    lock_after_parse: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            indent: true,
            validate_items: false,
            lock_after_parse: false,
        }
    }
}

impl ParserSettings {
    pub fn new() -> Self {
        ParserSettings::default()
    }

    pub fn indent(mut self, pretty: bool) -> Self {
        self.indent = pretty;
        self
    }

    pub fn validate_items(mut self, validate_items: bool) -> Self {
        self.validate_items = validate_items;
        self
    }

    pub fn lock_after_parse(mut self, lock_after_parse: bool) -> Self {
        self.lock_after_parse = lock_after_parse;
        self
    }

    pub fn should_indent(&self) -> bool {
        self.indent
    }

    pub fn should_validate_items(&self) -> bool {
        self.validate_items
    }

    pub fn should_lock_after_parse(&self) -> bool {
        self.lock_after_parse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let settings = ParserSettings::new()
            .indent(false)
            .validate_items(true)
            .lock_after_parse(true);

        assert!(!settings.should_indent());
        assert!(settings.should_validate_items());
        assert!(settings.should_lock_after_parse());
        assert!(ParserSettings::default().should_indent());
    }
}
