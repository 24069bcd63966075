//! Error adapter for converting MaquetteError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Programs arrive
//! as JSON, so there is no source-span information to attach; the adapter
//! contributes a stable error code and, where one helps, a hint.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use maquette::MaquetteError;

/// Adapter wrapping a [`MaquetteError`] for rich miette formatting.
pub struct ErrorAdapter(pub MaquetteError);

impl fmt::Debug for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MaquetteError::Io(_) => "maquette::io",
            MaquetteError::Validation(_) => "maquette::validation",
            MaquetteError::Encoding(_) => "maquette::encoding",
            MaquetteError::SamplingDivergence { .. } => "maquette::sampling",
            MaquetteError::NoTemplateMatch(_) => "maquette::template",
            MaquetteError::Mesh(_) => "maquette::mesh",
            MaquetteError::Export(_) => "maquette::export",
            MaquetteError::Canceled => "maquette::canceled",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            MaquetteError::SamplingDivergence { .. } => {
                "try another seed, or switch to template mode with --mode template"
            }
            MaquetteError::NoTemplateMatch(_) => {
                "provide a template library with --templates, or use --mode diffusion"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: MaquetteError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes_cover_every_variant() {
        assert_eq!(
            code_of(MaquetteError::Validation("bad".to_string())),
            "maquette::validation"
        );
        assert_eq!(
            code_of(MaquetteError::SamplingDivergence {
                seed: 7,
                attempts: 4
            }),
            "maquette::sampling"
        );
        assert_eq!(code_of(MaquetteError::Canceled), "maquette::canceled");
    }

    #[test]
    fn test_display_passes_through() {
        let adapter = ErrorAdapter(MaquetteError::Validation("two rooms overlap".to_string()));
        assert_eq!(adapter.to_string(), "Validation error: two rooms overlap");
    }

    #[test]
    fn test_divergence_gets_a_hint() {
        let adapter = ErrorAdapter(MaquetteError::SamplingDivergence {
            seed: 3,
            attempts: 4,
        });
        let help = adapter.help().unwrap().to_string();
        assert!(help.contains("--mode template"));

        let silent = ErrorAdapter(MaquetteError::Canceled);
        assert!(silent.help().is_none());
    }
}
