use ahash::AHashSet;
use geo::BoundingRect;
use tracing::{debug, info, warn};

use crate::{
    config::ResolveConfig,
    geom::{self, Geometries},
    park::{ParkFeature, ParkName, ResolvedPark},
    resolve::{
        classify::{classify_pairs, contained_members},
        cluster::connected_components,
        merge::MergedIdGenerator,
        report::{MergedCluster, ResolutionReport, SkipReason, SkippedFeature},
    },
};

/// Output of one resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Surviving input features in input order, followed by merged features in cluster order.
    pub parks: Vec<ResolvedPark>,
    pub report: ResolutionReport,
}

/// Why an input was dropped. Later variants win when several apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Removal {
    Unnamed,
    Contained,
    Manual,
}

/// Deduplicates and merges raw park polygons.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolveConfig,
}

impl Resolver {
    pub fn new(config: ResolveConfig) -> Self { Self { config } }

    #[inline] pub fn config(&self) -> &ResolveConfig { &self.config }

    /// Resolve raw park features into a set in which no two unnamed parks intersect,
    /// no unnamed park intersects a named one, and no named park lies inside another.
    ///
    /// Removals take precedence over merging: removed polygons are dropped from the
    /// intersection graph before clusters are formed. Running the output through
    /// `resolve` again with the same config returns it unchanged.
    pub fn resolve(&self, features: Vec<ParkFeature>) -> Resolution {
        let mut report = ResolutionReport::default();
        let input_count = features.len();
        let features = screen(features, &mut report.skipped);
        let features = drop_equal_unnamed(features, &mut report.skipped);

        let named = features.iter().map(|feature| feature.name.is_named()).collect::<Vec<_>>();
        let geoms = Geometries::new(features.iter().map(|feature| feature.geometry.clone()).collect());

        let classification = classify_pairs(&named, &geoms);
        let contained = contained_members(&classification.containment_candidates, &geoms);
        debug!(
            "[resolve] {} unnamed edges, {} unnamed conflicts, {} named pairs checked for containment",
            classification.edges.len(), classification.unnamed_removals.len(), classification.containment_candidates.len(),
        );

        let mut removed = vec![None::<Removal>; features.len()];
        let mut mark = |i: usize, why: Removal| removed[i] = removed[i].max(Some(why));
        classification.unnamed_removals.iter().for_each(|&i| mark(i, Removal::Unnamed));
        contained.iter().for_each(|&i| mark(i, Removal::Contained));

        let manual = self.config.manual_removals.iter().map(String::as_str).collect::<AHashSet<_>>();
        let mut found_manual = 0;
        for (i, feature) in features.iter().enumerate() {
            if manual.contains(feature.id.as_str()) {
                mark(i, Removal::Manual);
                found_manual += 1;
            }
        }
        if found_manual < manual.len() {
            debug!("[resolve] {} manual removal ids not present in input", manual.len() - found_manual);
        }

        report.intersection_edges = classification.edges.iter()
            .map(|&(a, b)| (features[a].id.clone(), features[b].id.clone()))
            .collect();

        let edges = classification.edges.iter()
            .filter(|&&(a, b)| removed[a].is_none() && removed[b].is_none())
            .copied()
            .collect::<Vec<_>>();
        let components = connected_components(features.len(), &edges);

        let mut ids = MergedIdGenerator::new(
            self.config.merged_id_seed,
            &self.config.merged_id_prefix,
            features.iter().map(|feature| feature.id.as_str()),
        );
        let mut in_cluster = vec![false; features.len()];
        let mut merged_parks = Vec::with_capacity(components.len());
        for component in &components {
            let id = ids.next_id();
            let geometry = geom::union_all(component.iter().map(|&i| geoms.shape(i)));
            component.iter().for_each(|&i| in_cluster[i] = true);

            report.merged.push(MergedCluster {
                id: id.clone(),
                members: component.iter().map(|&i| features[i].id.clone()).collect(),
            });
            merged_parks.push(ResolvedPark {
                feature: ParkFeature { id, name: ParkName::Merged, geometry, tags: Default::default() }
                    .with_tag("leisure", "park"),
                is_merged: true,
            });
        }

        let mut parks = Vec::with_capacity(features.len() + merged_parks.len());
        for (i, feature) in features.into_iter().enumerate() {
            match removed[i] {
                Some(Removal::Unnamed) => report.unnamed_removed.push(feature.id),
                Some(Removal::Contained) => report.contained_removed.push(feature.id),
                Some(Removal::Manual) => report.manually_removed.push(feature.id),
                None if in_cluster[i] => {}
                None => parks.push(ResolvedPark { is_merged: feature.name == ParkName::Merged, feature }),
            }
        }
        parks.extend(merged_parks);

        info!(
            "[resolve] {} features in, {} out: {} merged clusters, {} unnamed removed, {} contained removed, {} manually removed, {} skipped",
            input_count, parks.len(), report.merged.len(), report.unnamed_removed.len(),
            report.contained_removed.len(), report.manually_removed.len(), report.skipped.len(),
        );

        Resolution { parks, report }
    }
}

/// Drop features with a repeated identifier or unusable geometry, recording why.
fn screen(features: Vec<ParkFeature>, skipped: &mut Vec<SkippedFeature>) -> Vec<ParkFeature> {
    let mut seen = AHashSet::with_capacity(features.len());
    let mut kept = Vec::with_capacity(features.len());

    for feature in features {
        let reason = if !seen.insert(feature.id.clone()) {
            SkipReason::DuplicateId
        } else if let Err(issue) = geom::validate(&feature.geometry) {
            SkipReason::InvalidGeometry(issue)
        } else {
            kept.push(feature);
            continue;
        };

        warn!("[resolve] skipping feature {}: {}", feature.id, reason);
        skipped.push(SkippedFeature { id: feature.id, reason });
    }
    kept
}

/// Drop unnamed features whose geometry equals an earlier unnamed feature. Equal pairs
/// never form an intersection edge, so without this both copies would survive unmerged.
fn drop_equal_unnamed(features: Vec<ParkFeature>, skipped: &mut Vec<SkippedFeature>) -> Vec<ParkFeature> {
    let geoms = Geometries::new(features.iter().map(|feature| feature.geometry.clone()).collect());
    let mut duplicate_of = vec![None::<usize>; features.len()];

    for (i, feature) in features.iter().enumerate() {
        if feature.name.is_named() { continue }
        let Some(rect) = feature.geometry.bounding_rect() else { continue };
        let first = geoms.candidates(&rect).into_iter()
            .filter(|&j| j < i && duplicate_of[j].is_none() && !features[j].name.is_named())
            .find(|&j| geom::equals(geoms.shape(i), geoms.shape(j)));
        duplicate_of[i] = first;
    }

    let first_ids = duplicate_of.iter()
        .map(|of| of.map(|j| features[j].id.clone()))
        .collect::<Vec<_>>();
    let mut kept = Vec::with_capacity(features.len());
    for (feature, of) in features.into_iter().zip(first_ids) {
        match of {
            Some(of) => {
                let reason = SkipReason::DuplicateGeometry { of };
                warn!("[resolve] skipping feature {}: {}", feature.id, reason);
                skipped.push(SkippedFeature { id: feature.id, reason });
            }
            None => kept.push(feature),
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use geo::{polygon, MultiPolygon};

    use super::*;
    use crate::geom::GeometryIssue;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        polygon![(x: x0, y: y0), (x: x0, y: y1), (x: x1, y: y1), (x: x1, y: y0)].into()
    }

    fn ids(parks: &[ResolvedPark]) -> Vec<&str> {
        parks.iter().map(ResolvedPark::id).collect()
    }

    fn fixture() -> Vec<ParkFeature> {
        vec![
            ParkFeature::new("0", None, rect(0.0, 0.0, 2.0, 2.0)),
            ParkFeature::new("1", Some(""), rect(1.0, 1.0, 3.0, 3.0)),
            ParkFeature::new("2", None, rect(3.5, 1.0, 4.5, 2.5)),
            ParkFeature::new("3", Some("Park 3"), rect(4.0, 0.0, 6.0, 2.0)),
            ParkFeature::new("4", Some("Park 4"), rect(5.0, 1.0, 7.0, 3.0)),
            ParkFeature::new("5", Some("Park 5"), rect(4.5, 0.5, 5.5, 1.5)),
        ]
    }

    #[test]
    fn fixture_resolves_to_expected_set() {
        let resolution = Resolver::default().resolve(fixture());
        let report = &resolution.report;

        assert_eq!(report.intersection_edges, vec![("0".to_string(), "1".to_string())]);
        assert_eq!(report.unnamed_removed, vec!["2"]);
        assert_eq!(report.contained_removed, vec!["5"]);
        assert_eq!(report.merged.len(), 1);
        assert_eq!(report.merged[0].members, vec!["0", "1"]);

        let merged_id = report.merged[0].id.as_str();
        assert_eq!(ids(&resolution.parks), vec!["3", "4", merged_id]);

        let merged = &resolution.parks[2];
        assert!(merged.is_merged);
        assert_eq!(merged.name(), &ParkName::Merged);
        assert_eq!(merged.area(), 7.0);
    }

    #[test]
    fn manual_removal_wins_over_merging() {
        let config = ResolveConfig { manual_removals: vec!["1".into()], ..Default::default() };
        let resolution = Resolver::new(config).resolve(fixture());

        assert!(resolution.report.merged.is_empty());
        assert_eq!(resolution.report.manually_removed, vec!["1"]);
        assert_eq!(ids(&resolution.parks), vec!["0", "3", "4"]);
    }

    #[test]
    fn manual_removal_wins_over_containment() {
        let config = ResolveConfig { manual_removals: vec!["5".into()], ..Default::default() };
        let resolution = Resolver::new(config).resolve(fixture());

        assert!(resolution.report.contained_removed.is_empty());
        assert_eq!(resolution.report.manually_removed, vec!["5"]);
    }

    #[test]
    fn disjoint_features_pass_through_unchanged() {
        let features = vec![
            ParkFeature::new("a", None, rect(0.0, 0.0, 1.0, 1.0)),
            ParkFeature::new("b", Some("Grant Park"), rect(5.0, 5.0, 6.0, 6.0)),
        ];
        let resolution = Resolver::default().resolve(features.clone());

        assert!(resolution.report.is_fixed_point());
        let out = resolution.parks.into_iter().map(|park| park.feature).collect::<Vec<_>>();
        assert_eq!(out, features);
    }

    #[test]
    fn second_pass_is_a_fixed_point() {
        let first = Resolver::default().resolve(fixture());
        let again = first.parks.iter().map(|park| park.feature.clone()).collect();
        let second = Resolver::default().resolve(again);

        assert!(second.report.is_fixed_point());
        assert_eq!(second.parks, first.parks);
    }

    #[test]
    fn invalid_and_duplicate_features_are_skipped() {
        let features = vec![
            ParkFeature::new("a", None, rect(0.0, 0.0, 1.0, 1.0)),
            ParkFeature::new("a", None, rect(5.0, 5.0, 6.0, 6.0)),
            ParkFeature::new("flat", None, rect(0.0, 0.0, 0.0, 1.0)),
        ];
        let resolution = Resolver::default().resolve(features);

        assert_eq!(ids(&resolution.parks), vec!["a"]);
        assert_eq!(resolution.report.skipped, vec![
            SkippedFeature { id: "a".into(), reason: SkipReason::DuplicateId },
            SkippedFeature { id: "flat".into(), reason: SkipReason::InvalidGeometry(GeometryIssue::ZeroArea) },
        ]);
    }

    #[test]
    fn equal_unnamed_polygons_keep_the_first() {
        let features = vec![
            ParkFeature::new("a", None, rect(0.0, 0.0, 1.0, 1.0)),
            ParkFeature::new("b", None, polygon![(x: 1.0, y: 1.0), (x: 1.0, y: 0.0), (x: 0.0, y: 0.0), (x: 0.0, y: 1.0)]),
            ParkFeature::new("c", Some("Oz Park"), rect(5.0, 5.0, 6.0, 6.0)),
            ParkFeature::new("d", Some("Oz Park"), rect(5.0, 5.0, 6.0, 6.0)),
        ];
        let resolution = Resolver::default().resolve(features);

        assert_eq!(resolution.report.skipped, vec![
            SkippedFeature { id: "b".into(), reason: SkipReason::DuplicateGeometry { of: "a".into() } },
        ]);
        assert!(resolution.report.merged.is_empty());
        // Equal named parks are neither duplicates nor nested.
        assert_eq!(ids(&resolution.parks), vec!["a", "c", "d"]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let resolution = Resolver::default().resolve(Vec::new());
        assert!(resolution.parks.is_empty());
        assert!(resolution.report.is_fixed_point());
    }

    #[test]
    fn merged_ids_are_deterministic() {
        let a = Resolver::default().resolve(fixture());
        let b = Resolver::default().resolve(fixture());
        assert_eq!(a.report.merged, b.report.merged);
    }
}
