use indexmap::IndexMap;

/// A multi-valued string mapping: the raw input of a decode call.
///
/// Keys are unique and kept in first-seen order; the values of each key
/// keep their encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    entries: IndexMap<String, Vec<String>>,
}

impl RawForm {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` text.
    ///
    /// `+` decodes to a space and percent-escapes are decoded; invalid UTF-8
    /// is replaced rather than rejected. A leading `?` is ignored, so a raw
    /// query string including its separator is accepted too.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        form_urlencoded::parse(input.as_bytes())
            .into_owned()
            .collect()
    }

    /// Adds a value after any existing values of `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces all values of `key`.
    pub fn insert<I, V>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        // an existing key keeps its position
        let values = values.into_iter().map(Into::into).collect();
        self.entries.insert(key.into(), values);
    }

    /// The first value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Every value of `key`, in encounter order. Empty if the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `key` was submitted, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keys with their values, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RawForm {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawForm {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = RawForm::new();
        form.extend(iter);
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_and_groups() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("?Tags=a&Name=J%C3%BCrgen+K&Tags=b&Empty=&Tags=c");
        assert_eq!(form.keys().collect::<Vec<_>>(), ["Tags", "Name", "Empty"]);
        assert_eq!(form.get_all("Tags"), ["a", "b", "c"]);
        assert_eq!(form.get("Name"), Some("Jürgen K"));
        assert_eq!(form.get("Empty"), Some(""));
        assert!(form.contains_key("Empty"));
        assert_eq!(form.get("Missing"), None);
        assert!(form.get_all("Missing").is_empty());
    }

    #[test]
    fn bare_key_has_empty_value() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("Flag&Other=1");
        assert_eq!(form.get_all("Flag"), [""]);
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn empty_input() {
        formwork_testhelpers::setup();

        assert!(RawForm::parse("").is_empty());
        assert!(RawForm::parse("?").is_empty());
    }

    #[test]
    fn bracket_keys_are_decoded() {
        formwork_testhelpers::setup();

        let form = RawForm::parse("Items%5B0%5D.Name=x");
        assert_eq!(form.get("Items[0].Name"), Some("x"));
    }

    #[test]
    fn build_by_hand() {
        formwork_testhelpers::setup();

        let mut form: RawForm = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(form.get_all("a"), ["1", "3"]);

        form.insert("a", ["9"]);
        form.append("c", "4");
        assert_eq!(
            form.iter().map(|(k, v)| (k, v.len())).collect::<Vec<_>>(),
            [("a", 1), ("b", 1), ("c", 1)]
        );
        assert_eq!(form.get("a"), Some("9"));
    }
}
