use canny_image::Image;

use crate::error::EdgeError;

/// A disjoint-set forest over pixel indices.
pub(crate) struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Creates a forest of `len` singleton sets.
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    /// Returns the root of the set containing `id`, compressing the path to it.
    pub(crate) fn find(&mut self, mut id: usize) -> usize {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[id] != root {
            let next = self.parent[id];
            self.parent[id] = root;
            id = next;
        }

        root
    }

    /// Merges the sets containing `a` and `b`, the smaller one under the larger one.
    pub(crate) fn union(&mut self, a: usize, b: usize) -> usize {
        let a_root = self.find(a);
        let b_root = self.find(b);

        if a_root == b_root {
            return a_root;
        }

        let (big, small) = if self.size[a_root] >= self.size[b_root] {
            (a_root, b_root)
        } else {
            (b_root, a_root)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        big
    }
}

/// Label the 8-connected groups of nonzero pixels.
///
/// The first pass scans the image in row-major order and joins every nonzero
/// pixel with its already visited nonzero neighbors (west, north-west, north
/// and north-east). The second pass assigns consecutive labels to the roots.
///
/// Returns the label image, where zero marks the background and the groups are
/// numbered from one, and the number of groups.
pub(crate) fn connected_components(
    src: &Image<u8, 1>,
) -> Result<(Image<u32, 1>, usize), EdgeError> {
    let (rows, cols) = (src.rows(), src.cols());
    let data = src.as_slice();
    let mut forest = UnionFind::new(data.len());

    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            if data[idx] == 0 {
                continue;
            }

            if c > 0 && data[idx - 1] != 0 {
                forest.union(idx, idx - 1);
            }

            if r == 0 {
                continue;
            }
            let up = idx - cols;
            if c > 0 && data[up - 1] != 0 {
                forest.union(idx, up - 1);
            }
            if data[up] != 0 {
                forest.union(idx, up);
            }
            if c + 1 < cols && data[up + 1] != 0 {
                forest.union(idx, up + 1);
            }
        }
    }

    let mut root_labels = vec![0u32; data.len()];
    let mut labels = Image::<u32, 1>::from_size_val(src.size(), 0)?;
    let mut num_labels = 0;

    for (idx, label) in labels.as_slice_mut().iter_mut().enumerate() {
        if data[idx] == 0 {
            continue;
        }
        let root = forest.find(idx);
        if root_labels[root] == 0 {
            num_labels += 1;
            root_labels[root] = num_labels as u32;
        }
        *label = root_labels[root];
    }

    Ok((labels, num_labels))
}
