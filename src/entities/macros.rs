//! Macros for reducing boilerplate when declaring backend records

/// Implement [`Record`](crate::core::entity::Record) for a struct with an
/// `id: String` field and an optional `created_at` field
///
/// # Example
/// ```rust,ignore
/// impl_record!(Zone, "zone", "zones");
/// impl_record!(User, "user", "users", created_at);
/// ```
#[macro_export]
macro_rules! impl_record {
    ($type:ident, $singular:literal, $plural:literal, created_at) => {
        impl $crate::core::entity::Record for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn created_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.created_at
            }
        }
    };
    ($type:ident, $singular:literal, $plural:literal) => {
        impl $crate::core::entity::Record for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}
