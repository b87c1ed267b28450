//! Source language of a compile or link step.

use serde::{Deserialize, Serialize};

/// Selects the C or C++ compiler front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C language (default)
    #[default]
    C,
    /// C++ language
    #[serde(alias = "cpp", alias = "cxx", alias = "c++")]
    Cxx,
}

impl Language {
    /// Standard passed to the compiler (`c11` / `c++14`), shared by both dialects.
    pub fn standard(&self) -> &'static str {
        match self {
            Language::C => "c11",
            Language::Cxx => "c++14",
        }
    }
}
