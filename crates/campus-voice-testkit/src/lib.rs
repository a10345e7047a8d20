//! # Campus Voice Testkit
//!
//! Testing utilities for Campus Voice.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a [`ManualClock`] and a [`TestPortal`] over in-memory storage
//! - **Generators**: Proptest strategies for drafts, forms and identities
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use campus_voice_testkit::TestPortal;
//!
//! async fn example() {
//!     let fixture = TestPortal::new().await;
//!     fixture.sign_in_admin().await;
//!     assert_eq!(fixture.portal.feedback().len(), 3);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use campus_voice_testkit::generators::DraftParams;
//!
//! proptest! {
//!     #[test]
//!     fn anonymity_hides_name(params: DraftParams) {
//!         let draft = params.to_draft();
//!         prop_assert_eq!(draft.is_anonymous, draft.user_name.is_none());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{admin, student, ManualClock, TestPortal};
pub use generators::{DraftParams, FormParams};
