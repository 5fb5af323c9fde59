//! Port error enum generation.
//!
//! `define_port_error!` declares a `thiserror` enum and gives every variant
//! a snake_case constructor. Constructor parameters take `impl Into<T>`, so
//! adapters write `RecordsApiError::transport(err.to_string())` or
//! `AuthApiError::rejected(status, detail)` without spelling out the
//! variant.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Build a `" $variant "` error."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    // Accumulate `field: impl Into<T>` parameters and `field.into()`
    // initialisers one field at a time.
    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fields
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            #[doc = "Build a `" $variant "` error."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor and message coverage for the generated port errors.

    use rstest::rstest;

    use crate::domain::ErrorDetail;
    use crate::domain::ports::{AuthApiError, RecordsApiError, SessionStoreError};

    define_port_error! {
        /// Unit variants only appear here; the real ports all carry fields.
        pub enum SlotError {
            Locked => "session slot locked",
        }
    }

    #[test]
    fn string_fields_accept_borrowed_text() {
        let error = RecordsApiError::transport("connection reset by peer");
        assert_eq!(
            error,
            RecordsApiError::Transport {
                message: "connection reset by peer".to_owned()
            }
        );
        assert_eq!(
            error.to_string(),
            "records transport failed: connection reset by peer"
        );
    }

    #[rstest]
    #[case::with_detail(
        ErrorDetail::Message("Email already registered".into()),
        "backend rejected request (400): Email already registered"
    )]
    #[case::without_detail(ErrorDetail::Missing, "backend rejected request (400): no detail")]
    fn mixed_fields_render_through_the_detail(
        #[case] detail: ErrorDetail,
        #[case] expected: &str,
    ) {
        let error = AuthApiError::rejected(400_u16, detail);
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn single_variant_enums_get_constructors() {
        let error = SessionStoreError::io("permission denied");
        assert_eq!(error.to_string(), "session store write failed: permission denied");
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(SlotError::locked(), SlotError::Locked);
        assert_eq!(SlotError::Locked.to_string(), "session slot locked");
    }
}
