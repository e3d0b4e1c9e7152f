use serde::{Deserialize, Serialize};

/// One directory entry as returned by the data source.
///
/// Records are immutable once fetched; the app holds them in fetch order.
/// String fields default to empty when the endpoint omits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
  #[serde(default)]
  pub id: u64,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub address: Address,
}

/// Postal address fields of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub street: String,
  #[serde(default)]
  pub suite: String,
  #[serde(default)]
  pub city: String,
  #[serde(default, rename = "zipcode")]
  pub zip: String,
}

impl Address {
  /// Single-line display form: "street suite, city zip" with empty fields
  /// skipped. All fields empty yields an empty string.
  pub fn formatted(&self) -> String {
    let join_present = |parts: &[&str]| -> String {
      parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    };

    let local = join_present(&[self.street.as_str(), self.suite.as_str()]);
    let place = join_present(&[self.city.as_str(), self.zip.as_str()]);

    [local, place]
      .iter()
      .filter(|p| !p.is_empty())
      .cloned()
      .collect::<Vec<_>>()
      .join(", ")
  }
}
