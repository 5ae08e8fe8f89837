use std::collections::BTreeMap;
use std::fmt;

/// Final classification of a point. Unvisited points never escape a run;
/// while clustering they are tracked as `None` in an `Option<Label>` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Noise,
    /// Cluster identifiers start at 1 and are handed out in discovery order.
    Cluster(u32),
}

impl Label {
    pub fn is_noise(&self) -> bool {
        matches!(self, Label::Noise)
    }

    pub fn cluster_id(&self) -> Option<u32> {
        match self {
            Label::Noise => None,
            Label::Cluster(id) => Some(*id),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Noise => write!(f, "noise"),
            Label::Cluster(id) => write!(f, "cluster {}", id),
        }
    }
}

/// Point indices grouped by label. Noise, when present, is its own group and
/// sorts first; indices inside a group are ascending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterIndices {
    groups: BTreeMap<Label, Vec<usize>>,
}

impl ClusterIndices {
    pub fn from_labels(labels: &[Label]) -> Self {
        let mut groups: BTreeMap<Label, Vec<usize>> = BTreeMap::new();
        for (index, &label) in labels.iter().enumerate() {
            groups.entry(label).or_default().push(index);
        }
        Self { groups }
    }

    pub fn get(&self, label: Label) -> Option<&[usize]> {
        self.groups.get(&label).map(Vec::as_slice)
    }

    pub fn noise(&self) -> &[usize] {
        self.get(Label::Noise).unwrap_or(&[])
    }

    /// Non-noise groups as `(cluster id, indices)`, in id order.
    pub fn clusters(&self) -> impl Iterator<Item = (u32, &[usize])> {
        self.groups
            .iter()
            .filter_map(|(label, indices)| label.cluster_id().map(|id| (id, indices.as_slice())))
    }

    /// Number of clusters, not counting the noise group.
    pub fn n_clusters(&self) -> usize {
        self.groups.keys().filter(|label| !label.is_noise()).count()
    }

    /// Number of groups, the noise group included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Vec<usize>)> {
        self.groups.iter()
    }

    pub fn into_inner(self) -> BTreeMap<Label, Vec<usize>> {
        self.groups
    }
}
