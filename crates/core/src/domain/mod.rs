pub mod application;
pub mod scoring;

use std::fmt;

/// A categorical value that did not match any known option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.field, self.value)
    }
}

impl std::error::Error for ParseCategoryError {}

/// Closed set of string-coded options. Serializes as the wire string and
/// refuses anything outside the set on parse or deserialize.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident as $field:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == trimmed)
                    .ok_or_else(|| $crate::domain::ParseCategoryError {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

pub(crate) use categorical;
