// src/cluster.rs

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{DEFAULT_N_CLUSTERS, KMEANS_MAX_ITER, KMEANS_SEED};
use crate::features::{FeatureExtractor, FEATURE_DIM};
use crate::models::Provider;

/// Per-dimension standardization to zero mean and unit variance, fitted
/// over the current provider set.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fits mean and scale per dimension. Zero-variance dimensions get a
    /// scale of 1.0 so they pass through centered but undivided.
    pub fn fit(features: &[[f64; FEATURE_DIM]]) -> Self {
        let n = features.len() as f64;
        let mut means = vec![0.0; FEATURE_DIM];
        let mut scales = vec![1.0; FEATURE_DIM];

        for row in features {
            for (dim, value) in row.iter().enumerate() {
                means[dim] += value;
            }
        }
        for mean in means.iter_mut() {
            *mean /= n;
        }

        for dim in 0..FEATURE_DIM {
            let variance = features
                .iter()
                .map(|row| (row[dim] - means[dim]).powi(2))
                .sum::<f64>()
                / n;
            let std_dev = variance.sqrt();
            if std_dev > 0.0 {
                scales[dim] = std_dev;
            }
        }

        Self { means, scales }
    }

    pub fn transform(&self, features: &[[f64; FEATURE_DIM]]) -> Vec<Vec<f64>> {
        features
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(dim, value)| (value - self.means[dim]) / self.scales[dim])
                    .collect()
            })
            .collect()
    }
}

/// K-means partition of the provider set over standardized features.
///
/// Uses a fixed seed so repeated fits over an unchanged provider set produce
/// the same assignment. Centroids are stored in standardized space.
#[derive(Debug)]
pub struct ClusterModel {
    n_clusters: usize,
    max_iter: usize,
    seed: u64,
    scaler: Option<StandardScaler>,
    centroids: Vec<Vec<f64>>,
}

impl Default for ClusterModel {
    fn default() -> Self {
        Self::new(DEFAULT_N_CLUSTERS)
    }
}

impl ClusterModel {
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_iter: KMEANS_MAX_ITER,
            seed: KMEANS_SEED,
            scaler: None,
            centroids: Vec::new(),
        }
    }

    /// True once a fit has stored centroids.
    pub fn is_fitted(&self) -> bool {
        !self.centroids.is_empty()
    }

    /// Centroids in standardized feature space, one per cluster.
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Standardizes features over the current provider set, partitions it
    /// into at most `n_clusters` groups and writes a cluster label onto
    /// every provider. No-op on an empty set. With fewer providers than
    /// clusters, the effective cluster count drops to the provider count.
    pub fn fit(&mut self, providers: &mut [Provider], extractor: &mut FeatureExtractor) {
        if providers.is_empty() {
            debug!("Cluster fit skipped: no providers loaded");
            return;
        }

        let features = extractor.extract_all(providers);
        let scaler = StandardScaler::fit(&features);
        let scaled = scaler.transform(&features);

        let k = self.n_clusters.min(providers.len());
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centroids = init_centroids_plus_plus(&scaled, k, &mut rng);
        let mut assignments = vec![0usize; scaled.len()];

        for iteration in 0..self.max_iter {
            let mut changed = false;
            for (i, point) in scaled.iter().enumerate() {
                let nearest = nearest_centroid(point, &centroids);
                if assignments[i] != nearest {
                    assignments[i] = nearest;
                    changed = true;
                }
            }

            // Recompute each centroid as the mean of its members; a cluster
            // that lost all members keeps its previous centroid
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let mut count = 0usize;
                let mut sums = vec![0.0; FEATURE_DIM];
                for (i, point) in scaled.iter().enumerate() {
                    if assignments[i] == cluster {
                        count += 1;
                        for (dim, value) in point.iter().enumerate() {
                            sums[dim] += value;
                        }
                    }
                }
                if count > 0 {
                    for (dim, sum) in sums.into_iter().enumerate() {
                        centroid[dim] = sum / count as f64;
                    }
                }
            }

            if !changed && iteration > 0 {
                debug!("K-means converged after {} iterations", iteration);
                break;
            }
        }

        for (provider, cluster) in providers.iter_mut().zip(assignments.iter()) {
            provider.cluster = Some(*cluster);
        }

        self.scaler = Some(scaler);
        self.centroids = centroids;
        info!(
            "Clustered {} providers into {} groups",
            providers.len(),
            k
        );
    }
}

// K-means++ initialization: first centroid uniform, each subsequent one
// sampled proportionally to squared distance from the nearest chosen centroid.
fn init_centroids_plus_plus(
    points: &[Vec<f64>],
    k: usize,
    rng: &mut ChaCha8Rng,
) -> Vec<Vec<f64>> {
    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    while centroids.len() < k {
        let distances: Vec<f64> = points
            .iter()
            .map(|p| {
                centroids
                    .iter()
                    .map(|c| squared_distance(p, c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = distances.iter().sum();

        let chosen = if total > 0.0 {
            let mut threshold = rng.gen::<f64>() * total;
            let mut index = points.len() - 1;
            for (i, d) in distances.iter().enumerate() {
                threshold -= d;
                if threshold <= 0.0 {
                    index = i;
                    break;
                }
            }
            index
        } else {
            // All points coincide with a centroid already
            rng.gen_range(0..points.len())
        };
        centroids.push(points[chosen].clone());
    }

    centroids
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (cluster, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = cluster;
        }
    }
    best
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}
