//! List item payloads and the course projection.

// crates.io
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Items whose grace-day counter reaches this value are dropped.
pub const GRACE_DAY_LIMIT: f64 = 30.0;

/// Field holding the course identifier.
pub const ID_FIELD: &str = "ID";
/// Field holding the course display name.
pub const NAME_FIELD: &str = "NombreCursoEstandar";
/// Field holding the grace-day counter.
pub const GRACE_DAYS_FIELD: &str = "ContadorDiasGracia";

/// One page of `GET .../lists/{list}/items` results.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListItemsPage {
	/// Items in upstream order; absent means empty.
	#[serde(default)]
	pub value: Vec<ListItem>,
}

/// A SharePoint list item with its expanded `fields` object.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListItem {
	/// Item-level identifier assigned by Graph.
	#[serde(default)]
	pub id: Option<Value>,
	/// Column values selected through `$expand=fields(...)`.
	#[serde(default)]
	pub fields: Map<String, Value>,
}
impl ListItem {
	/// Course identifier: `fields.ID`, then `fields.id`, then the item-level `id`.
	pub fn course_id(&self) -> Value {
		[self.fields.get(ID_FIELD), self.fields.get("id"), self.id.as_ref()]
			.into_iter()
			.flatten()
			.find(|value| !value.is_null())
			.cloned()
			.unwrap_or(Value::Null)
	}

	/// Course display name, `null` when the column is empty.
	pub fn course_name(&self) -> Value {
		self.fields.get(NAME_FIELD).cloned().unwrap_or(Value::Null)
	}

	/// Grace-day counter as a number. Numeric strings are accepted.
	pub fn grace_days(&self) -> Option<f64> {
		match self.fields.get(GRACE_DAYS_FIELD)? {
			Value::Number(number) => number.as_f64(),
			Value::String(text) => text.trim().parse().ok(),
			_ => None,
		}
	}

	/// True when the counter is known and strictly below [`GRACE_DAY_LIMIT`].
	pub fn within_grace(&self) -> bool {
		self.grace_days().is_some_and(|days| days < GRACE_DAY_LIMIT)
	}
}

/// Projection served to callers. No other field is ever emitted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CourseSummary {
	/// Course identifier.
	#[serde(rename = "ID")]
	pub id: Value,
	/// Course display name.
	#[serde(rename = "NombreCursoEstandar")]
	pub name: Value,
}
impl From<&ListItem> for CourseSummary {
	fn from(item: &ListItem) -> Self {
		Self { id: item.course_id(), name: item.course_name() }
	}
}

/// Keeps items inside the grace window and projects them, preserving order.
pub fn summarize(items: &[ListItem]) -> Vec<CourseSummary> {
	items.iter().filter(|item| item.within_grace()).map(CourseSummary::from).collect()
}
