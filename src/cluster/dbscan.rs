use crate::cluster::labels::{ClusterIndices, Label};
use crate::error::{Error, Result};
use crate::index::{KdTree, KdTreeParams, Neighbour};
use crate::point::PointCloud;
use log::{debug, info};
use ndarray::NdFloat;
use std::collections::VecDeque;

/// How a cluster grows from the core point that opened it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Seed queue: every core point reached while growing a cluster has its
    /// own neighbourhood queued, however deep it sits.
    #[default]
    Canonical,
    /// Neighbours of the opening point are visited once. Those that turn out
    /// to be core points label their own neighbourhood in place, but points
    /// labelled that way are never queried for this cluster. Chained shapes
    /// can break into several clusters.
    OneLevel,
}

#[derive(Clone, Debug)]
pub struct DBSCAN<T = f64> {
    pub labels: Option<Vec<Label>>,
    pub core_sample_indices: Option<Vec<usize>>,
    pub cluster_indices: Option<ClusterIndices>,
    distance_threshold_squared: T,
    min_neighbour_points: usize,
    expansion: Expansion,
    index_params: KdTreeParams,
}

impl<T: NdFloat> DBSCAN<T> {
    /// `min_neighbour_points` counts the point itself.
    pub fn new(distance_threshold: T, min_neighbour_points: usize) -> Result<Self> {
        if !distance_threshold.is_finite() || distance_threshold < T::zero() {
            return Err(Error::config(format!(
                "distance_threshold must be finite and >= 0, got {}",
                distance_threshold
            )));
        }
        if min_neighbour_points == 0 {
            return Err(Error::config("min_neighbour_points must be > 0"));
        }

        Ok(Self {
            labels: None,
            core_sample_indices: None,
            cluster_indices: None,
            distance_threshold_squared: distance_threshold * distance_threshold,
            min_neighbour_points,
            expansion: Expansion::default(),
            index_params: KdTreeParams::default(),
        })
    }

    pub fn expansion(mut self, expansion: Expansion) -> Self {
        self.expansion = expansion;
        self
    }

    /// Checked by `fit`, whatever the size of the cloud.
    pub fn leaf_size(mut self, leaf_size: usize) -> Self {
        self.index_params.leaf_size = leaf_size;
        self
    }

    pub fn sort_results(mut self, sort_results: bool) -> Self {
        self.index_params.sort_results = sort_results;
        self
    }

    pub fn distance_threshold_squared(&self) -> T {
        self.distance_threshold_squared
    }

    pub fn min_neighbour_points(&self) -> usize {
        self.min_neighbour_points
    }

    pub fn fit<const D: usize>(&mut self, cloud: &PointCloud<T, D>) -> Result<()> {
        self.labels = None;
        self.core_sample_indices = None;
        self.cluster_indices = None;

        if self.index_params.leaf_size == 0 {
            return Err(Error::config("leaf_size must be > 0"));
        }

        if cloud.len() < 2 {
            debug!("{} points is too few to cluster", cloud.len());
            self.labels = Some(Vec::new());
            self.core_sample_indices = Some(Vec::new());
            self.cluster_indices = Some(ClusterIndices::default());
            return Ok(());
        }

        let tree = KdTree::build(cloud, self.index_params)?;
        let mut run = Run::new(&tree, self.distance_threshold_squared, self.min_neighbour_points);
        run.execute(self.expansion);
        let (labels, core_samples) = run.finish();

        let cluster_indices = ClusterIndices::from_labels(&labels);
        info!(
            "Number of clusters: {} ({} noise points of {})",
            cluster_indices.n_clusters(),
            cluster_indices.noise().len(),
            labels.len()
        );

        self.core_sample_indices = Some(core_samples);
        self.cluster_indices = Some(cluster_indices);
        self.labels = Some(labels);

        Ok(())
    }

    pub fn fit_predict<const D: usize>(&mut self, cloud: &PointCloud<T, D>) -> Result<Vec<Label>> {
        self.fit(cloud)?;
        Ok(self.labels.clone().unwrap_or_default())
    }

    /// Point indices grouped by label, once fitted.
    pub fn cluster_indices(&self) -> Option<&ClusterIndices> {
        self.cluster_indices.as_ref()
    }

    pub fn get_n_clusters(&self) -> Option<usize> {
        self.cluster_indices().map(ClusterIndices::n_clusters)
    }

    pub fn get_n_noise_points(&self) -> Option<usize> {
        self.cluster_indices().map(|groups| groups.noise().len())
    }

    pub fn is_core_sample(&self, sample_idx: usize) -> Option<bool> {
        self.core_sample_indices
            .as_ref()
            .map(|core_indices| core_indices.binary_search(&sample_idx).is_ok())
    }
}

/// State of a single clustering pass. Owns the working label array, where
/// `None` marks a point not yet visited.
struct Run<'t, T, const D: usize> {
    tree: &'t KdTree<'t, T, D>,
    squared_radius: T,
    min_points: usize,
    labels: Vec<Option<Label>>,
    core: Vec<bool>,
    #[cfg(test)]
    transitions: Vec<(usize, Option<Label>, Label)>,
}

impl<'t, T: NdFloat, const D: usize> Run<'t, T, D> {
    fn new(tree: &'t KdTree<'t, T, D>, squared_radius: T, min_points: usize) -> Self {
        Self {
            tree,
            squared_radius,
            min_points,
            labels: vec![None; tree.len()],
            core: vec![false; tree.len()],
            #[cfg(test)]
            transitions: Vec::new(),
        }
    }

    fn execute(&mut self, expansion: Expansion) {
        let mut seeds = Vec::new();
        let mut current_cluster = 0;

        for index in 0..self.labels.len() {
            if self.labels[index].is_some() {
                continue;
            }

            if !self.neighbourhood(index, &mut seeds) {
                self.assign(index, Label::Noise);
                continue;
            }

            current_cluster += 1;
            let cluster = Label::Cluster(current_cluster);
            self.core[index] = true;
            self.assign(index, cluster);

            let reached = match expansion {
                Expansion::Canonical => self.expand_canonical(cluster, &seeds),
                Expansion::OneLevel => self.expand_one_level(cluster, &seeds),
            };
            debug!("{} opened at point {}, grew by {} points", cluster, index, reached);
        }
    }

    /// Fills `neighbours` with the neighbourhood of `index` and reports
    /// whether it is dense enough for a core point.
    fn neighbourhood(&self, index: usize, neighbours: &mut Vec<Neighbour<T>>) -> bool {
        let points = self.tree.cloud().points();
        self.tree
            .radius_search_into(&points[index], self.squared_radius, neighbours);
        neighbours.len() >= self.min_points
    }

    fn expand_canonical(&mut self, cluster: Label, seeds: &[Neighbour<T>]) -> usize {
        let mut queue: VecDeque<usize> = seeds.iter().map(|nb| nb.index).collect();
        let mut neighbours = Vec::new();
        let mut reached = 0;

        while let Some(index) = queue.pop_front() {
            match self.labels[index] {
                // Border point: joins the cluster, is not expanded.
                Some(Label::Noise) => {
                    self.assign(index, cluster);
                    reached += 1;
                }
                Some(Label::Cluster(_)) => {}
                None => {
                    self.assign(index, cluster);
                    reached += 1;

                    if self.neighbourhood(index, &mut neighbours) {
                        self.core[index] = true;
                        let labels = &self.labels;
                        queue.extend(
                            neighbours
                                .iter()
                                .map(|nb| nb.index)
                                .filter(|&i| matches!(labels[i], None | Some(Label::Noise))),
                        );
                    }
                }
            }
        }

        reached
    }

    fn expand_one_level(&mut self, cluster: Label, seeds: &[Neighbour<T>]) -> usize {
        let mut neighbours = Vec::new();
        let mut reached = 0;

        for seed in seeds {
            match self.labels[seed.index] {
                Some(Label::Noise) => {
                    self.assign(seed.index, cluster);
                    reached += 1;
                }
                Some(Label::Cluster(_)) => {}
                None => {
                    self.assign(seed.index, cluster);
                    reached += 1;

                    if !self.neighbourhood(seed.index, &mut neighbours) {
                        continue;
                    }
                    self.core[seed.index] = true;

                    // Labelled in place, never queried for this cluster.
                    for nb in neighbours.iter().filter(|nb| nb.index != seed.index) {
                        if matches!(self.labels[nb.index], None | Some(Label::Noise)) {
                            self.assign(nb.index, cluster);
                            reached += 1;
                        }
                    }
                }
            }
        }

        reached
    }

    /// Unvisited points may take any label and noise may join a cluster.
    /// Nothing else moves.
    fn assign(&mut self, index: usize, label: Label) {
        let previous = self.labels[index];
        debug_assert!(
            previous.is_none() || (previous == Some(Label::Noise) && !label.is_noise()),
            "point {} cannot move from {:?} to {:?}",
            index,
            previous,
            label
        );

        #[cfg(test)]
        self.transitions.push((index, previous, label));

        self.labels[index] = Some(label);
    }

    /// Final labels and the ascending core point indices.
    fn finish(self) -> (Vec<Label>, Vec<usize>) {
        debug_assert!(self.labels.iter().all(Option::is_some));
        let labels = self
            .labels
            .into_iter()
            .map(|label| label.unwrap_or(Label::Noise))
            .collect();
        let core_samples = self
            .core
            .iter()
            .enumerate()
            .filter(|&(_, &is_core)| is_core)
            .map(|(i, _)| i)
            .collect();
        (labels, core_samples)
    }
}
