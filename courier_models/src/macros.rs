macro_rules! nutype_string {
    ($ident:ident($($args:tt)*)) => {
        #[::nutype::nutype(
            $($args)*,
            derive(Debug, Clone, PartialEq, Eq, Deref, TryFrom, Display)
        )]
        pub struct $ident(String);
    };
}

macro_rules! sensitive_debug {
    ($ident:ident < $($generics:ident),* >) => {
        impl<$($generics),*> ::std::fmt::Debug for $ident<$($generics),*> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str("[sensitive]")
            }
        }
    };
}

pub(crate) use nutype_string;
pub(crate) use sensitive_debug;
