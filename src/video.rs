use serde::{Deserialize, Serialize};

/// fields of a freshly created video document
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
	#[serde(default)]
	pub restaurant_id: Option<String>,
	#[serde(default)]
	pub restaurant_name: Option<String>,
}

impl VideoRecord {
	#[must_use]
	pub fn new(restaurant_id: &str, restaurant_name: &str) -> Self {
		Self {
			restaurant_id: Some(restaurant_id.to_string()),
			restaurant_name: Some(restaurant_name.to_string()),
		}
	}
}

/// a record creation event, `record` is `None` if the document had no data
#[derive(Clone, Debug, PartialEq)]
pub struct VideoCreated {
	pub video_id: String,
	pub record: Option<VideoRecord>,
}

/// a video that passed validation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewVideo<'a> {
	pub video_id: &'a str,
	pub restaurant_id: &'a str,
	pub restaurant_name: &'a str,
}

impl VideoCreated {
	#[must_use]
	pub fn new(video_id: &str, record: Option<VideoRecord>) -> Self {
		Self {
			video_id: video_id.to_string(),
			record,
		}
	}

	/// `None` if the record is absent or misses a restaurant id or name
	#[must_use]
	pub fn validate(&self) -> Option<NewVideo<'_>> {
		let record = self.record.as_ref()?;

		let restaurant_id = non_empty(record.restaurant_id.as_deref())?;
		let restaurant_name =
			non_empty(record.restaurant_name.as_deref())?;

		Some(NewVideo {
			video_id: &self.video_id,
			restaurant_id,
			restaurant_name,
		})
	}
}

fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}
