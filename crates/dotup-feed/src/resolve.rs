//! Latest-release resolution and per-component artifact selection.

use crate::date;
use crate::error::FeedError;
use crate::model::{
    Arch, ArtifactRecord, ComponentKind, Release, ReleaseComponent, ReleaseIndex, TaggedArtifact,
};

/// Select the unique release matching all four `latest-*` pointers.
///
/// Fails if any pointer is the undefined sentinel, if no release matches, or
/// if more than one does.
pub fn resolve_latest(index: &ReleaseIndex) -> Result<&Release, FeedError> {
    if index.latest_release.is_undefined() {
        return Err(FeedError::UndefinedLatest { field: "release" });
    }
    if index.latest_sdk.is_undefined() {
        return Err(FeedError::UndefinedLatest { field: "sdk" });
    }
    if index.latest_runtime.is_undefined() {
        return Err(FeedError::UndefinedLatest { field: "runtime" });
    }
    if date::is_undefined(index.latest_release_date) {
        return Err(FeedError::UndefinedLatest {
            field: "release date",
        });
    }

    let mut candidate: Option<&Release> = None;
    for release in &index.releases {
        if release.release_date == index.latest_release_date
            && release.release_version == index.latest_release
            && release.sdk.version == index.latest_sdk
            && release.runtime.version == index.latest_runtime
        {
            if candidate.is_some() {
                return Err(FeedError::AmbiguousRelease {
                    date: index.latest_release_date,
                    release: index.latest_release.clone(),
                });
            }
            candidate = Some(release);
        }
    }

    candidate.ok_or_else(|| FeedError::NoMatchingRelease {
        date: index.latest_release_date,
        release: index.latest_release.clone(),
        sdk: index.latest_sdk.clone(),
        runtime: index.latest_runtime.clone(),
    })
}

/// Build the download descriptors for every artifact of a release.
///
/// For each component group, picks exactly one `linux-x64` and one
/// `linux-arm64` record and tags them `amd64`/`arm64`; every other platform
/// is dropped. Output order is the order the manifest emits: sdk, aspnetcore,
/// runtime, amd64 before arm64 within each.
pub fn select_artifacts(release: &Release) -> Result<Vec<TaggedArtifact>, FeedError> {
    let components = [
        (ComponentKind::Sdk, &release.sdk),
        (ComponentKind::Aspnetcore, &release.aspnetcore_runtime),
        (ComponentKind::Runtime, &release.runtime),
    ];

    let mut selected = Vec::with_capacity(components.len() * 2);
    for (kind, component) in components {
        for arch in [Arch::Amd64, Arch::Arm64] {
            let record = select_unique(kind, component, arch)?;
            selected.push(TaggedArtifact::from_record(kind, arch, record));
        }
    }
    Ok(selected)
}

/// Pick the single record whose rid matches the architecture's platform
/// identifier. Zero matches and duplicate matches are both errors.
fn select_unique<'a>(
    kind: ComponentKind,
    component: &'a ReleaseComponent,
    arch: Arch,
) -> Result<&'a ArtifactRecord, FeedError> {
    let rid = arch.rid();
    let mut matches = component
        .files
        .iter()
        .filter(|record| record.rid.as_deref() == Some(rid));

    let found = matches.next().ok_or(FeedError::MissingArtifact {
        component: kind,
        rid,
    })?;
    if matches.next().is_some() {
        return Err(FeedError::AmbiguousArtifact {
            component: kind,
            rid,
        });
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dotup_version::ReleaseVersion;
    use url::Url;

    fn record(rid: &str, tag: &str) -> ArtifactRecord {
        ArtifactRecord {
            name: format!("dotnet-{tag}-{rid}.tar.gz"),
            rid: Some(rid.to_string()),
            url: Url::parse(&format!("https://builds.example.com/{tag}/{rid}.tar.gz")).unwrap(),
            hash: format!("{tag}-{rid}-hash"),
        }
    }

    fn component(version: &str, tag: &str) -> ReleaseComponent {
        ReleaseComponent {
            version: ReleaseVersion::parse(version),
            files: vec![
                record("win-x64", tag),
                record("linux-x64", tag),
                record("osx-arm64", tag),
                record("linux-arm64", tag),
            ],
        }
    }

    fn release(date: (i32, u32, u32), version: &str, sdk: &str, runtime: &str) -> Release {
        Release {
            release_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            release_version: ReleaseVersion::parse(version),
            security: false,
            release_notes: None,
            runtime: component(runtime, "runtime"),
            sdk: component(sdk, "sdk"),
            aspnetcore_runtime: component(runtime, "aspnetcore"),
        }
    }

    fn index(releases: Vec<Release>) -> ReleaseIndex {
        ReleaseIndex {
            releases,
            latest_release: ReleaseVersion::parse("8.0.1"),
            latest_runtime: ReleaseVersion::parse("8.0.1"),
            latest_sdk: ReleaseVersion::parse("8.0.101"),
            latest_release_date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        }
    }

    #[test]
    fn resolves_the_unique_match() {
        let idx = index(vec![
            release((2023, 12, 12), "8.0.0", "8.0.100", "8.0.0"),
            release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1"),
        ]);
        let resolved = resolve_latest(&idx).unwrap();
        assert_eq!(resolved.release_version, ReleaseVersion::parse("8.0.1"));
    }

    #[test]
    fn zero_candidates_is_an_error() {
        let idx = index(vec![release((2023, 12, 12), "8.0.0", "8.0.100", "8.0.0")]);
        assert!(matches!(
            resolve_latest(&idx),
            Err(FeedError::NoMatchingRelease { .. })
        ));
    }

    #[test]
    fn duplicate_candidates_are_ambiguous() {
        let idx = index(vec![
            release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1"),
            release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1"),
        ]);
        assert!(matches!(
            resolve_latest(&idx),
            Err(FeedError::AmbiguousRelease { .. })
        ));
    }

    #[test]
    fn partial_pointer_match_is_not_a_candidate() {
        // Same date and release version, but a different SDK version.
        let idx = index(vec![release((2024, 1, 9), "8.0.1", "8.0.102", "8.0.1")]);
        assert!(matches!(
            resolve_latest(&idx),
            Err(FeedError::NoMatchingRelease { .. })
        ));
    }

    #[test]
    fn undefined_latest_pointers_are_rejected() {
        let mut idx = index(vec![release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1")]);
        idx.latest_sdk = ReleaseVersion::UNDEFINED;
        assert!(matches!(
            resolve_latest(&idx),
            Err(FeedError::UndefinedLatest { field: "sdk" })
        ));

        let mut idx = index(vec![release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1")]);
        idx.latest_release_date = crate::date::UNDEFINED;
        assert!(matches!(
            resolve_latest(&idx),
            Err(FeedError::UndefinedLatest {
                field: "release date"
            })
        ));
    }

    #[test]
    fn selects_two_artifacts_per_component() {
        let rel = release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1");
        let artifacts = select_artifacts(&rel).unwrap();

        assert_eq!(artifacts.len(), 6);
        let tags: Vec<(ComponentKind, Arch)> =
            artifacts.iter().map(|a| (a.component, a.arch)).collect();
        assert_eq!(
            tags,
            vec![
                (ComponentKind::Sdk, Arch::Amd64),
                (ComponentKind::Sdk, Arch::Arm64),
                (ComponentKind::Aspnetcore, Arch::Amd64),
                (ComponentKind::Aspnetcore, Arch::Arm64),
                (ComponentKind::Runtime, Arch::Amd64),
                (ComponentKind::Runtime, Arch::Arm64),
            ]
        );

        // Each descriptor is sourced from the record with the matching rid.
        let sdk_amd64 = &artifacts[0];
        assert!(sdk_amd64.url.as_str().ends_with("/sdk/linux-x64.tar.gz"));
        assert_eq!(sdk_amd64.reference_digest, "sdk-linux-x64-hash");
        let sdk_arm64 = &artifacts[1];
        assert!(sdk_arm64.url.as_str().ends_with("/sdk/linux-arm64.tar.gz"));
    }

    #[test]
    fn missing_architecture_is_an_error() {
        let mut rel = release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1");
        rel.sdk.files.retain(|r| r.rid.as_deref() != Some("linux-arm64"));
        assert!(matches!(
            select_artifacts(&rel),
            Err(FeedError::MissingArtifact {
                component: ComponentKind::Sdk,
                rid: "linux-arm64"
            })
        ));
    }

    #[test]
    fn duplicate_architecture_is_ambiguous() {
        let mut rel = release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1");
        rel.runtime.files.push(record("linux-x64", "runtime"));
        assert!(matches!(
            select_artifacts(&rel),
            Err(FeedError::AmbiguousArtifact {
                component: ComponentKind::Runtime,
                rid: "linux-x64"
            })
        ));
    }

    #[test]
    fn records_without_rid_are_skipped() {
        let mut rel = release((2024, 1, 9), "8.0.1", "8.0.101", "8.0.1");
        rel.sdk.files[0].rid = None;
        let artifacts = select_artifacts(&rel).unwrap();
        assert_eq!(artifacts.len(), 6);
    }

    #[test]
    fn catalog_deserializes_from_feed_json() {
        let json = r#"{
            "latest-release": "8.0.1",
            "latest-release-date": "2024-1-9",
            "latest-runtime": "8.0.1",
            "latest-sdk": "8.0.101",
            "releases": [{
                "release-date": "2024-01-09",
                "release-version": "8.0.1",
                "security": true,
                "release-notes": "https://example.com/notes/8.0.1",
                "runtime": {
                    "version": "8.0.1",
                    "files": [
                        {"name": "a.tar.gz", "rid": "linux-x64", "url": "https://example.com/a.tar.gz", "hash": "aa"},
                        {"name": "b.tar.gz", "rid": "linux-arm64", "url": "https://example.com/b.tar.gz", "hash": "bb"}
                    ]
                },
                "sdk": {
                    "version": "8.0.101",
                    "files": [
                        {"name": "c.tar.gz", "rid": "linux-x64", "url": "https://example.com/c.tar.gz", "hash": "cc"},
                        {"name": "d.tar.gz", "rid": "linux-arm64", "url": "https://example.com/d.tar.gz", "hash": "dd"}
                    ]
                },
                "aspnetcore-runtime": {
                    "version": "8.0.1",
                    "files": [
                        {"name": "e.tar.gz", "rid": "linux-x64", "url": "https://example.com/e.tar.gz", "hash": "ee"},
                        {"name": "f.tar.gz", "url": "https://example.com/f.tar.gz", "hash": "ff"}
                    ]
                }
            }]
        }"#;

        let idx: ReleaseIndex = serde_json::from_str(json).unwrap();
        assert_eq!(idx.latest_sdk, ReleaseVersion::parse("8.0.101"));
        assert_eq!(
            idx.latest_release_date,
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap()
        );
        let rel = resolve_latest(&idx).unwrap();
        assert!(rel.security);
        assert_eq!(rel.aspnetcore_runtime.files[1].rid, None);
    }
}
