use crate::beads::new::Beads;
use crate::errors::Result;

impl Beads {
    /// Isotropic rescaling of the cell and of every position by `mu`.
    pub fn scale_box(&mut self, mu: f64) -> Result<()> {
        self.sim_box.scale(mu)?;
        self.positions *= mu;
        Ok(())
    }

    pub fn wrap_positions(&mut self) {
        for mut r_i in self.positions.column_iter_mut() {
            let mut r = r_i.clone_owned();
            self.sim_box.wrap(&mut r);
            r_i.copy_from(&r);
        }
    }
}
