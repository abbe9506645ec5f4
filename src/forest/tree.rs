//! Weighted CART tree for binary classification (Gini impurity).

use rand::rngs::StdRng;
use rand::seq::index;

pub type NodeIndex = usize;

#[derive(Debug, Clone)]
pub enum Node {
    Leaf {
        /// Weighted share of the positive class at this leaf
        positive: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: NodeIndex,
        right: NodeIndex,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub max_features: usize,
}

/// Positive and negative weight mass of a set of samples
#[derive(Debug, Clone, Copy, Default)]
struct ClassMass {
    neg: f64,
    pos: f64,
}

impl ClassMass {
    fn add(&mut self, positive: bool, w: f64) {
        if positive {
            self.pos += w;
        } else {
            self.neg += w;
        }
    }

    fn sub(&mut self, positive: bool, w: f64) {
        if positive {
            self.pos -= w;
        } else {
            self.neg -= w;
        }
    }

    fn total(&self) -> f64 {
        self.neg + self.pos
    }

    fn gini(&self) -> f64 {
        let t = self.total();
        if t <= 0.0 {
            return 0.0;
        }
        let p = self.pos / t;
        let q = self.neg / t;
        1.0 - p * p - q * q
    }
}

struct Candidate {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

/// Training view shared by every node of one tree
pub struct TrainingSet<'a> {
    pub rows: &'a [Vec<f64>],
    pub labels: &'a [bool],
    pub weights: &'a [f64],
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Unnormalized impurity decrease accumulated per feature
    importances: Vec<f64>,
}

impl DecisionTree {
    /// Grow a tree on `samples` (indices into `data`; duplicates act as bootstrap draws).
    pub fn fit(data: &TrainingSet, samples: Vec<usize>, params: TreeParams, rng: &mut StdRng) -> Self {
        let n_features = data.rows.first().map(Vec::len).unwrap_or(0);
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        tree.grow(data, samples, 0, params, rng);
        tree
    }

    fn mass(data: &TrainingSet, samples: &[usize]) -> ClassMass {
        let mut m = ClassMass::default();
        for &i in samples {
            m.add(data.labels[i], data.weights[i]);
        }
        m
    }

    fn grow(
        &mut self,
        data: &TrainingSet,
        samples: Vec<usize>,
        depth: usize,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> NodeIndex {
        let mass = Self::mass(data, &samples);
        let id = self.nodes.len();
        let positive = if mass.total() > 0.0 { mass.pos / mass.total() } else { 0.0 };
        self.nodes.push(Node::Leaf { positive });

        let pure = mass.pos <= 0.0 || mass.neg <= 0.0;
        if depth >= params.max_depth || pure || samples.len() < 2 * params.min_samples_leaf.max(1) {
            return id;
        }

        let Some(best) = self.best_split(data, &samples, mass, params, rng) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| data.rows[i][best.feature] <= best.threshold);

        self.importances[best.feature] += best.decrease;
        let l = self.grow(data, left, depth + 1, params, rng);
        let r = self.grow(data, right, depth + 1, params, rng);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: l,
            right: r,
        };
        id
    }

    fn best_split(
        &self,
        data: &TrainingSet,
        samples: &[usize],
        parent: ClassMass,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Option<Candidate> {
        let n_features = self.importances.len();
        let k = params.max_features.clamp(1, n_features.max(1));
        let parent_impurity = parent.total() * parent.gini();
        let mut best: Option<Candidate> = None;

        let mut order = samples.to_vec();
        for feature in index::sample(rng, n_features, k) {
            order.sort_by(|&a, &b| data.rows[a][feature].total_cmp(&data.rows[b][feature]));

            let mut left = ClassMass::default();
            let mut right = parent;
            for pos in 0..order.len() - 1 {
                let i = order[pos];
                left.add(data.labels[i], data.weights[i]);
                right.sub(data.labels[i], data.weights[i]);

                let n_left = pos + 1;
                if n_left < params.min_samples_leaf || order.len() - n_left < params.min_samples_leaf {
                    continue;
                }
                let here = data.rows[i][feature];
                let next = data.rows[order[pos + 1]][feature];
                if here >= next {
                    continue;
                }

                let child = left.total() * left.gini() + right.total() * right.gini();
                let decrease = parent_impurity - child;
                if decrease > 1e-12 && best.as_ref().map_or(true, |b| decrease > b.decrease) {
                    best = Some(Candidate {
                        feature,
                        threshold: here + (next - here) / 2.0,
                        decrease,
                    });
                }
            }
        }
        best
    }

    /// Positive-class probability for one row
    pub fn predict_positive(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { positive } => return *positive,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    at = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Impurity decrease per feature, normalized to sum to 1 (zeros for a stump).
    pub fn feature_importances(&self) -> Vec<f64> {
        let total: f64 = self.importances.iter().sum();
        if total <= 0.0 {
            return vec![0.0; self.importances.len()];
        }
        self.importances.iter().map(|v| v / total).collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: NodeIndex) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}
