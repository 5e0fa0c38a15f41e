/// Declares the `Subtype` vocabulary.
///
/// Every subtype is listed once with its family and canonical text token, so
/// `family()` and `text()` stay total over the enum.
macro_rules! oval_subtypes {
    ($($variant:ident => ($family:ident, $text:literal)),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub enum Subtype {
            #[default]
            Unknown,
            $($variant,)+
        }

        impl Subtype {
            /// Every known subtype, `Unknown` excluded.
            pub const ALL: &'static [Subtype] = &[$(Subtype::$variant,)+];

            pub fn family(self) -> Family {
                match self {
                    Subtype::Unknown => Family::Unknown,
                    $(Subtype::$variant => Family::$family,)+
                }
            }

            pub fn text(self) -> &'static str {
                match self {
                    Subtype::Unknown => "unknown",
                    $(Subtype::$variant => $text,)+
                }
            }
        }
    };
}

/// Declares a closed vocabulary enum whose variants map one-to-one to text tokens.
/// Variant attributes are passed through, so `#[derive(Default)]` on the enum
/// pairs with `#[default]` on a variant.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            pub fn text(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            fn from_token(token: &str) -> Option<Self> {
                match token {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.text())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.text())
            }
        }
    };
}
