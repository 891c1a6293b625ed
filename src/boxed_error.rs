//! Error types that are a single pointer wide.

//! Parse and compile results are passed around a lot while the
//! errors are rare and carry strings and positions, hence box them.

/// Define an error type wrapper e.g. `Foo` around a
/// `Box<FooKind>`. `Foo` derefs to `FooKind`, implements
/// `std::error::Error` and `Display` by forwarding, and converts from
/// everything `FooKind` converts from, so `?` and `thiserror`'s
/// `#[from]` keep working. `FooKind` has to be defined separately.
#[macro_export]
macro_rules! def_boxed_error {
    ($wrappername:ident, $kindname:ident) => {

        #[derive(Debug)]
        pub struct $wrappername(Box<$kindname>);

        impl $wrappername {
            pub fn kind(&self) -> &$kindname {
                &*self.0
            }

            pub fn into_kind(self) -> $kindname {
                *self.0
            }
        }

        impl std::ops::Deref for $wrappername {
            type Target = $kindname;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl<E> From<E> for $wrappername where $kindname: From<E> {
            fn from(err: E) -> Self {
                $wrappername(Box::new($kindname::from(err)))
            }
        }

        impl std::error::Error for $wrappername {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                self.0.source()
            }
        }

        impl std::fmt::Display for $wrappername {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&*self.0, f)
            }
        }
    }
}


/// Defines both an error type and its box wrapper as per
/// `def_boxed_error`, deriving `thiserror::Error` and `Debug` on the
/// inner type.
#[macro_export]
macro_rules! def_boxed_thiserror {
    ($wrappername:ident, $(#[$meta:meta])* pub enum $kindname:ident {$($body:tt)*}) => {
        #[derive(thiserror::Error, Debug)]
        $(#[$meta])*
        pub enum $kindname {
            $($body)*
        }

        $crate::def_boxed_error!($wrappername, $kindname);
    };
    ($wrappername:ident, $(#[$meta:meta])* pub struct $kindname:ident {$($body:tt)*}) => {
        #[derive(thiserror::Error, Debug)]
        $(#[$meta])*
        pub struct $kindname {
            $($body)*
        }

        $crate::def_boxed_error!($wrappername, $kindname);
    };
}
