//! Dispatcher emission.
//!
//! A record whose selector carries `build = "Target"` gets
//! `pub fn build(&self) -> Result<Target, E>`. The selector's value is
//! matched against each candidate's key and the matching candidate's
//! conversion method is called.

use proc_macro2::TokenStream;
use quote::quote;

use super::{RecordBuilder, member_tokens, parse_ident};
use crate::cache::{BUILD, INVALID_CHOICE};
use crate::context::GenContext;
use crate::error::EnvgenError;

/// Emits the dispatcher for `record`, or nothing when it has no selector.
///
/// # Errors
///
/// Returns [`EnvgenError::InvalidTemplate`] when the target type or a
/// candidate's `build_with` method is not valid Rust.
pub fn write(record: &RecordBuilder, ctx: &mut GenContext) -> Result<TokenStream, EnvgenError> {
    let Some(selector) = record.selector() else {
        return Ok(TokenStream::new());
    };
    let Some(target) = selector.selector.as_deref() else {
        return Ok(TokenStream::new());
    };
    let target_ty: syn::Type = syn::parse_str(target)
        .map_err(|source| EnvgenError::invalid_template("build type", target, source))?;
    ctx.errors.add(INVALID_CHOICE);
    ctx.errors.add(BUILD);

    let error = &ctx.error;
    let selector_member = member_tokens(selector)?;
    let mut arms = Vec::new();
    for candidate in record.candidates() {
        let label = &candidate.key;
        let member = member_tokens(candidate)?;
        let method = parse_ident("build_with method", &candidate.build_with)?;
        tracing::debug!(
            record = record.name(),
            label = %label,
            candidate = %candidate.type_name,
            method = %candidate.build_with,
            "dispatch case"
        );
        arms.push(quote! {
            #label => self
                .#member
                .as_ref()
                .ok_or_else(|| #error::InvalidChoice(self.#selector_member.clone()))?
                .#method()
                .map(Into::into)
                .map_err(|source| #error::Build(self.#selector_member.clone(), source.into()))
        });
    }

    let doc = format!(
        " Builds the `{target}` named by `{}`.",
        selector.name
    );
    Ok(quote! {
        #[doc = #doc]
        ///
        /// # Errors
        ///
        /// Returns an error when the selected configuration is absent, the
        /// selector names no known choice, or the selected builder fails.
        pub fn build(&self) -> Result<#target_ty, #error> {
            match self.#selector_member.as_str() {
                #(#arms,)*
                other => Err(#error::InvalidChoice(other.to_owned())),
            }
        }
    })
}
