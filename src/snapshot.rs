/// Read-only row-major view of the spin angles, the only thing renderers
/// and exporters get to see of a lattice.
#[derive(Debug, Clone, Copy)]
pub struct LatticeView<'a> {
    width: usize,
    angles: &'a [f64],
}

impl<'a> LatticeView<'a> {
    pub(crate) fn new(width: usize, angles: &'a [f64]) -> Self {
        debug_assert_eq!(angles.len(), width * width);
        Self { width, angles }
    }

    /// Side length; the view is `width × width`.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.width)
    }

    /// Angle at `(row, col)`, or `None` outside the lattice.
    pub fn angle(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.width && col < self.width {
            Some(self.angles[row * self.width + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&'a [f64]> {
        let angles: &'a [f64] = self.angles;
        (row < self.width).then(|| &angles[row * self.width..(row + 1) * self.width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        let angles: &'a [f64] = self.angles;
        angles.chunks_exact(self.width.max(1))
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.angles
    }

    /// Owned copy as nested rows.
    pub fn to_grid(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::lattice::Lattice;

    #[test]
    fn view_matches_spins() {
        let lat = Lattice::new(5, 1.0, 0.0, 17).unwrap();
        let view = lat.snapshot();
        assert_eq!(view.dimensions(), (5, 5));
        assert_eq!(view.angle(2, 3), Some(lat.spin(13)));
        assert_eq!(view.angle(5, 0), None);
        assert_eq!(view.row(4).unwrap(), &lat.spins()[20..25]);
        assert!(view.row(5).is_none());
        let grid = view.to_grid();
        assert_eq!(grid.len(), 5);
        assert!(grid.iter().all(|r| r.len() == 5));
        assert_eq!(grid[1][0], lat.spin(5));
    }
}
