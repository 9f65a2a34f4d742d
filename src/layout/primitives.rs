use std::sync::Arc;

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::utils::percentage::Percentage;

/// Opaque colour handed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColourRef(Arc<str>);

impl ColourRef {
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Horizontally packed block. `margin` is the gap to the end of the previous block of the row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSegment {
    #[serde(rename = "colorRef")]
    pub colour: ColourRef,
    #[serde(rename = "widthPercent")]
    pub width: Percentage,
    #[serde(rename = "marginPercent")]
    pub margin: Percentage,
}

/// Vertically stacked block of a column, measured from the bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSegment {
    #[serde(rename = "colorRef")]
    pub colour: ColourRef,
    #[serde(rename = "heightPercent")]
    pub height: Percentage,
    #[serde(rename = "positionPercent")]
    pub position: Percentage,
}

/// A segment together with the name of the sector or project it stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Labelled<S> {
    pub label: Arc<str>,
    #[serde(flatten)]
    pub segment: S,
}

/// Normalized histogram with the index of the bucket that represents "now".
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram<const N: usize> {
    pub values: [Percentage; N],
    pub highlight: Option<usize>,
}

impl<const N: usize> Serialize for Histogram<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Histogram", 2)?;
        state.serialize_field("valuePercent", self.values.as_slice())?;
        state.serialize_field("highlight", &self.highlight)?;
        state.end()
    }
}
