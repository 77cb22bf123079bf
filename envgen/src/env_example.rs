//! `.env` example rendering.
//!
//! Lists every key reachable from the root record with its doc comment and
//! the value the loader would use: the default when there is one, the
//! type's zero value for required keys. Keys that may be left unset are
//! commented out.

use indexmap::IndexMap;

use crate::converters::ConverterTable;
use crate::field::Field;
use crate::record::RecordBuilder;

/// Renders the example for the records of one run.
///
/// `records` must hold every record reachable from `root`; the graph must
/// be acyclic.
#[must_use]
pub fn render(
    root: &str,
    records: &IndexMap<String, RecordBuilder>,
    converters: &ConverterTable,
) -> String {
    let mut out = format!("# Environment for `{root}`, generated by envgen.\n");
    if let Some(record) = records.get(root) {
        let mut writer = Writer {
            records,
            converters,
            out: &mut out,
        };
        writer.record(record, None, None);
    }
    out
}

struct Writer<'a> {
    records: &'a IndexMap<String, RecordBuilder>,
    converters: &'a ConverterTable,
    out: &'a mut String,
}

impl Writer<'_> {
    fn record(&mut self, record: &RecordBuilder, prefix: Option<&str>, guard: Option<&str>) {
        let selector_key = record.selector().map(|s| full_key(prefix, &s.key));
        for field in record.fields() {
            let key = full_key(prefix, &field.key);
            if field.custom {
                let Some(nested) = self.records.get(&field.type_name) else {
                    continue;
                };
                let nested_guard = match (&selector_key, field.guarded) {
                    (Some(selector), true) => Some(format!("{selector}={}", field.key)),
                    _ => guard.map(ToOwned::to_owned),
                };
                self.out.push('\n');
                for line in field.docs.lines() {
                    self.comment(line);
                }
                self.record(nested, Some(&key), nested_guard.as_deref());
                continue;
            }
            self.field(field, &key, guard, record);
        }
    }

    fn field(&mut self, field: &Field, key: &str, guard: Option<&str>, record: &RecordBuilder) {
        for line in field.docs.lines() {
            self.comment(line);
        }
        if field.is_selector() {
            let labels: Vec<&str> = record.candidates().map(|c| c.key.as_str()).collect();
            self.comment(&format!("one of: {}", labels.join(", ")));
        }
        if let Some(guard) = guard {
            self.comment(&format!("used when {guard}"));
        }

        if field.declared_optional && field.default_literal.is_none() {
            self.out.push_str(&format!("# {key}=\n"));
            return;
        }
        let value = field.default_literal.as_deref().map_or_else(
            || {
                self.converters
                    .lookup(&field.type_name)
                    .map_or("", |converter| converter.zero)
                    .to_owned()
            },
            quote_value,
        );
        self.out.push_str(&format!("{key}={value}\n"));
    }

    fn comment(&mut self, line: &str) {
        if line.is_empty() {
            self.out.push_str("#\n");
        } else {
            self.out.push_str(&format!("# {line}\n"));
        }
    }
}

fn full_key(prefix: Option<&str>, key: &str) -> String {
    prefix.map_or_else(|| key.to_owned(), |prefix| format!("{prefix}_{key}"))
}

fn quote_value(value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == '#' || c == '"') {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "HOST", "HOST")]
    #[case(Some("DATA_STORE"), "KIND", "DATA_STORE_KIND")]
    fn joins_keys(#[case] prefix: Option<&str>, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(full_key(prefix, key), expected);
    }

    #[rstest]
    #[case("localhost", "localhost")]
    #[case("GET,POST", "GET,POST")]
    #[case("hello world", "\"hello world\"")]
    #[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
    fn quotes_when_needed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(quote_value(raw), expected);
    }
}
