//! Proptest generators for property-based testing.

use proptest::prelude::*;

use campus_voice_core::{
    Category, FeedbackDraft, FeedbackForm, Identity, Role, Status, UserId,
};

/// Generate a Category.
pub fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Generate a Status.
pub fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Pending),
        Just(Status::InProgress),
        Just(Status::Resolved),
    ]
}

/// Generate a Role.
pub fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Student), Just(Role::Admin)]
}

/// Generate an email address with a dotted local part.
pub fn email() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z]{1,8})?@[a-z]{2,8}\\.(com|edu)".prop_map(String::from)
}

/// Generate an identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    (email(), role(), "[A-Z][a-z]{1,10}").prop_map(|(email, role, name)| {
        let id = UserId::from_email(&email);
        match role {
            Role::Admin => Identity::admin(id, name, email),
            Role::Student => Identity::student(id, name, email),
        }
    })
}

/// Generate a title that passes form validation.
pub fn valid_title() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{4,60}".prop_map(String::from)
}

/// Generate a description that passes form validation.
pub fn valid_description() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ,.]{19,200}".prop_map(String::from)
}

/// Generate comment text with at least one visible character.
pub fn comment_text() -> impl Strategy<Value = String> {
    " {0,3}[A-Za-z0-9][A-Za-z0-9 ,.!?]{0,80}".prop_map(String::from)
}

/// Parameters for generating a draft.
#[derive(Debug, Clone)]
pub struct DraftParams {
    pub author: Identity,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub is_anonymous: bool,
}

impl DraftParams {
    pub fn to_draft(&self) -> FeedbackDraft {
        FeedbackDraft::from_author(
            &self.author,
            self.title.clone(),
            self.description.clone(),
            self.category,
            self.is_anonymous,
        )
    }

    pub fn to_form(&self) -> FeedbackForm {
        FeedbackForm {
            title: self.title.clone(),
            description: self.description.clone(),
            category: Some(self.category),
            is_anonymous: self.is_anonymous,
        }
    }
}

impl Arbitrary for DraftParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            identity(),
            valid_title(),
            valid_description(),
            category(),
            any::<bool>(),
        )
            .prop_map(
                |(author, title, description, category, is_anonymous)| DraftParams {
                    author,
                    title,
                    description,
                    category,
                    is_anonymous,
                },
            )
            .boxed()
    }
}

/// Raw form input, valid or not.
#[derive(Debug, Clone)]
pub struct FormParams {
    pub form: FeedbackForm,
}

impl Arbitrary for FormParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "[A-Za-z ]{0,120}",
            "[A-Za-z ]{0,40}",
            prop::option::of(category()),
            any::<bool>(),
        )
            .prop_map(|(title, description, category, is_anonymous)| FormParams {
                form: FeedbackForm {
                    title,
                    description,
                    category,
                    is_anonymous,
                },
            })
            .boxed()
    }
}
