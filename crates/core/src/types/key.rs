//! Closed sets of lookup keys.
//!
//! Every tool input that selects a reference row is one of a fixed set of
//! kebab-case strings. The [`lookup_key!`](crate::lookup_key) macro generates
//! an enum for each set with matching serde names, `Display`, `FromStr` and an
//! `ALL` table used to build JSON Schema `enum` constraints.

/// Error returned when a string is not a member of a lookup key set.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct UnknownKey {
    /// Human-readable name of the key set (e.g. "brew method").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Define a lookup key enum.
///
/// Attributes on a variant are forwarded, so a default member can be marked
/// with `#[default]` alongside `#[derive(Default)]` on the enum.
///
/// ```
/// brew_concierge_core::lookup_key! {
///     /// Roast level.
///     #[derive(Default)]
///     pub enum Roast("roast") {
///         Light => "light",
///         #[default]
///         Dark => "dark",
///     }
/// }
///
/// assert_eq!(Roast::default(), Roast::Dark);
/// assert_eq!(Roast::Dark.as_str(), "dark");
/// assert_eq!("light".parse::<Roast>(), Ok(Roast::Light));
/// assert_eq!(Roast::ALL.len(), 2);
/// ```
#[macro_export]
macro_rules! lookup_key {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire and database key for this member.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// All keys as strings, in declaration order.
            #[must_use]
            pub fn keys() -> Vec<&'static str> {
                Self::ALL.iter().map(|k| k.as_str()).collect()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::UnknownKey;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    _ => Err($crate::UnknownKey {
                        kind: $kind,
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}
