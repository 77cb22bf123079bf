//! Formatting of the assembled output.

use proc_macro2::TokenStream;

use crate::error::EnvgenError;

/// Builds the header comment placed above the generated items.
#[must_use]
pub fn header(root: &str, source_label: Option<&str>) -> String {
    source_label.map_or_else(
        || format!("// Code generated by envgen from `{root}`. DO NOT EDIT.\n\n"),
        |label| format!("// Code generated by envgen from `{root}` in {label}. DO NOT EDIT.\n\n"),
    )
}

/// Pretty-prints `tokens` below `header`.
///
/// # Errors
///
/// Returns [`EnvgenError::Format`] when the tokens do not form a valid Rust
/// file. The unformatted text is logged at `error` level and kept in the
/// error.
pub fn format_file(header: &str, tokens: TokenStream) -> Result<String, EnvgenError> {
    let buffer = tokens.to_string();
    match syn::parse2::<syn::File>(tokens) {
        Ok(file) => Ok(format!("{header}{}", prettyplease::unparse(&file))),
        Err(source) => {
            tracing::error!(%buffer, error = %source, "generated code failed to parse");
            Err(EnvgenError::Format { source, buffer })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use quote::quote;
    use rstest::rstest;

    #[rstest]
    fn formats_with_header() -> Result<()> {
        let text = format_file(
            &header("Config", None),
            quote! { use std::env; fn a() -> u8 { 1 } },
        )
        .map_err(|err| anyhow!(err))?;
        ensure!(
            text.starts_with("// Code generated by envgen from `Config`. DO NOT EDIT.\n\nuse std::env;\n"),
            "unexpected output:\n{text}"
        );
        ensure!(text.contains("fn a() -> u8 {\n    1\n}\n"), "unexpected output:\n{text}");
        Ok(())
    }

    #[rstest]
    fn labels_source() {
        assert_eq!(
            header("Config", Some("src/config.rs")),
            "// Code generated by envgen from `Config` in src/config.rs. DO NOT EDIT.\n\n"
        );
    }

    #[rstest]
    fn invalid_tokens_keep_buffer() -> Result<()> {
        let err = format_file("", quote! { fn broken })
            .err()
            .ok_or_else(|| anyhow!("expected a format error"))?;
        let EnvgenError::Format { buffer, .. } = &err else {
            return Err(anyhow!("unexpected error {err}"));
        };
        ensure!(buffer.contains("fn broken"));
        Ok(())
    }
}
