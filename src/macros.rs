//! Accessor macros for closed node-kind enums
//!
//! All macros use `paste` internally for identifier concatenation.

// =============================================================================
// NodeKind predicate generation
// =============================================================================

/// Generate `is_xxx` predicates for fieldless enum variants
///
/// # Generated methods per variant:
/// - `is_xxx(&self) -> bool` - variant check, name in snake case
///
/// # Example
/// ```ignore
/// impl NodeKind {
///     impl_kind_predicates!(Root, LineBreak);
///     // Expands to: pub fn is_root(&self) -> bool, pub fn is_line_break(&self) -> bool
/// }
/// ```
#[macro_export]
macro_rules! impl_kind_predicates {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a `" $variant "` node"]
                #[inline]
                pub fn [<is_ $variant:snake>](&self) -> bool {
                    matches!(self, Self::$variant)
                }
            )*
        }
    };
}

/// Generate the `name()` method mapping each variant to a static string
///
/// # Example
/// ```ignore
/// impl_kind_names!(Root => "root", Block => "block");
/// // Expands to: pub fn name(&self) -> &'static str { match self { ... } }
/// ```
#[macro_export]
macro_rules! impl_kind_names {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Stable lowercase name of this kind
        pub fn name(&self) -> &'static str {
            match self {
                $(Self::$variant => $name,)*
            }
        }

        /// All variants, in declaration order
        pub const fn all() -> &'static [Self] {
            &[$(Self::$variant,)*]
        }
    };
}
