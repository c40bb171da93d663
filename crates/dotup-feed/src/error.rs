use chrono::NaiveDate;
use dotup_version::ReleaseVersion;
use thiserror::Error;

use crate::model::ComponentKind;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed declares an undefined latest {field}")]
    UndefinedLatest { field: &'static str },

    #[error(
        "no release matches the latest pointers: date {date}, release {release}, sdk {sdk}, runtime {runtime}"
    )]
    NoMatchingRelease {
        date: NaiveDate,
        release: ReleaseVersion,
        sdk: ReleaseVersion,
        runtime: ReleaseVersion,
    },

    #[error("more than one release matches the latest pointers: release {release} dated {date}")]
    AmbiguousRelease {
        date: NaiveDate,
        release: ReleaseVersion,
    },

    #[error("component {component} has no {rid} artifact")]
    MissingArtifact {
        component: ComponentKind,
        rid: &'static str,
    },

    #[error("component {component} has more than one {rid} artifact")]
    AmbiguousArtifact {
        component: ComponentKind,
        rid: &'static str,
    },
}
