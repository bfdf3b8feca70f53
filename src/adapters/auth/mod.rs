//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `supabase` - Production validator for Supabase HS256 access tokens
//! - `mock` - Test implementation that doesn't require real tokens

mod mock;
mod supabase;

pub use mock::MockSessionValidator;
pub use supabase::SupabaseSessionValidator;
