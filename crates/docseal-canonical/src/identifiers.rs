use crate::digest::Digest;
use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! identifier {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Digest);

        impl $name {
            /// Wraps an already computed digest.
            pub fn new(digest: Digest) -> Self {
                Self(digest)
            }

            /// Parses a prefixed hex identifier.
            pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
                Digest::parse(value).map(Self)
            }

            /// Returns the prefixed hex form.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Returns the underlying digest.
            pub fn digest(&self) -> &Digest {
                &self.0
            }
        }

        impl From<Digest> for $name {
            fn from(value: Digest) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

identifier!(
    ContentIdentifier,
    "Byte-content hash of raw document bytes."
);
identifier!(
    MetadataIdentifier,
    "Byte-content hash of a canonical metadata serialization."
);
