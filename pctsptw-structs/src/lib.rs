pub mod config;
pub mod core;

/// Declares a serde struct with public fields. Attributes before the name go on the
/// struct, attributes before a field go on that field.
#[macro_export]
macro_rules! serializable_struct {
    (
        $(#[$struct_attr:meta])*
        $name:ident {
            $( $(#[$attr:meta])* $param:ident : $type:ty ),* $(,)?
        }
    ) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
        $(#[$struct_attr])*
        pub struct $name {
            $(
                $(#[$attr])*
                pub $param : $type,
            )*
        }
    };
}
