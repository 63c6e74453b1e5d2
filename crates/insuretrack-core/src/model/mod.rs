//! Domain entities: users, policies, claims and notifications

/// Declares a closed set of lowercase string values stored as TEXT columns
/// and serialized verbatim into snapshots.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::TrackerError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::errors::TrackerError::InvalidEnumValue {
                        kind: $kind.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

pub(crate) use text_enum;

pub mod claim;
pub mod notification;
pub mod policy;
pub mod user;

pub use claim::{Claim, ClaimInput, ClaimStatus, ClaimUpdate};
pub use notification::{NewNotification, Notification, NotificationType};
pub use policy::{Policy, PolicyInput, PolicyStatus, PolicyType, EXPIRY_WINDOW_DAYS};
pub use user::{NewUser, Registration, Role, User};
