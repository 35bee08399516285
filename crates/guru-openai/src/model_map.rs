use std::borrow::Cow;

use guru_core::model::Model;

/// Wire name of `model`, or `None` if it cannot be sent.
pub(crate) fn map_model(model: &Model) -> Option<Cow<'static, str>> {
    match model {
        Model::Groq(groq) => Some(groq.id().into()),
        Model::Custom(custom) if custom.trim().is_empty() => None,
        Model::Custom(custom) => Some(custom.clone()),
    }
}
