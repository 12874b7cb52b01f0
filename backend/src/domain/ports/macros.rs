//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! parameters accept anything convertible into the field type.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
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
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use crate::domain::UserId;

    define_port_error! {
        pub enum ProbeError {
            Gone { slug: String } => "gone: {slug}",
            Empty { user_id: UserId } => "empty: {user_id}",
            Failed { slug: String, attempts: u32 } => "failed {slug} after {attempts}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(ProbeError::gone("beta").to_string(), "gone: beta");
    }

    #[test]
    fn newtype_fields_accept_raw_values() {
        let err = ProbeError::empty(42_i64);
        assert_eq!(err, ProbeError::Empty { user_id: UserId::new(42) });
        assert_eq!(err.to_string(), "empty: 42");
    }

    #[test]
    fn mixed_fields_are_converted_independently() {
        let err = ProbeError::failed("alpha", 3_u32);
        assert_eq!(err.to_string(), "failed alpha after 3");
    }
}
