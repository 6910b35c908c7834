use serde::Deserialize;
use url::form_urlencoded;

use crate::record::Record;

/// The `add` / `edit` query parameters that drive the item form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormQuery {
    pub add: Option<String>,
    pub edit: Option<String>,
}

impl FormQuery {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn add() -> Self {
        Self {
            add: Some("true".into()),
            edit: None,
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            add: None,
            edit: Some(id.into()),
        }
    }

    /// Parses `add=true`, `?edit=42`, ... Unknown keys are ignored and the
    /// last occurrence of a key wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "add" => parsed.add = Some(value.into_owned()),
                "edit" => parsed.edit = Some(value.into_owned()),
                _ => {}
            }
        }
        parsed
    }

    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(add) = &self.add {
            serializer.append_pair("add", add);
        }
        if let Some(edit) = &self.edit {
            serializer.append_pair("edit", edit);
        }
        serializer.finish()
    }

    fn wants_add(&self) -> bool {
        self.add.as_deref() == Some("true")
    }

    fn edit_target(&self) -> Option<&str> {
        self.edit.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<R> {
    pub open: bool,
    pub editing: Option<R>,
}

impl<R> FormState<R> {
    pub fn closed() -> Self {
        Self {
            open: false,
            editing: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.open && self.editing.is_some()
    }
}

impl<R> Default for FormState<R> {
    fn default() -> Self {
        Self::closed()
    }
}

/// Derives the form state from the query and the current collection alone.
/// An `edit` id missing from `items` keeps the form closed.
pub fn resolve_form<R: Record>(query: &FormQuery, items: &[R]) -> FormState<R> {
    if query.wants_add() {
        return FormState {
            open: true,
            editing: None,
        };
    }
    let Some(id) = query.edit_target() else {
        return FormState::closed();
    };
    match items.iter().find(|record| record.id() == Some(id)) {
        Some(record) => FormState {
            open: true,
            editing: Some(record.clone()),
        },
        None => {
            tracing::debug!(resource = R::RESOURCE, id = %id, "edit target not in collection");
            FormState::closed()
        }
    }
}

/// Tracks the current query and recomputes the form state whenever either
/// the query or the collection changes.
#[derive(Debug, Clone)]
pub struct FormRoute<R> {
    query: FormQuery,
    state: FormState<R>,
}

impl<R: Record> FormRoute<R> {
    pub fn new() -> Self {
        Self {
            query: FormQuery::none(),
            state: FormState::closed(),
        }
    }

    pub fn query(&self) -> &FormQuery {
        &self.query
    }

    pub fn state(&self) -> &FormState<R> {
        &self.state
    }

    pub fn navigate(&mut self, query: FormQuery, items: &[R]) -> &FormState<R> {
        self.query = query;
        self.state = resolve_form(&self.query, items);
        &self.state
    }

    pub fn on_collection_changed(&mut self, items: &[R]) -> &FormState<R> {
        self.state = resolve_form(&self.query, items);
        &self.state
    }

    /// Clears the query, which is how the form is dismissed or finished.
    pub fn close(&mut self) {
        self.query = FormQuery::none();
        self.state = FormState::closed();
    }
}

impl<R: Record> Default for FormRoute<R> {
    fn default() -> Self {
        Self::new()
    }
}
