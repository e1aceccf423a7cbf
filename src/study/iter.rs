use crate::sampler::FinishedTrial;

use super::Study;

impl Study {
    /// Return an iterator over all finished trials.
    ///
    /// This clones the internal trial list, so it is suitable for
    /// analysis and iteration but not for hot paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperstudy::Study;
    ///
    /// let study = Study::minimize();
    /// study.complete_trial(study.ask(), 1.0).unwrap();
    ///
    /// for t in study.iter() {
    ///     println!("Trial {} → {:?}", t.index, t.value);
    /// }
    /// ```
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<FinishedTrial> {
        self.trials().into_iter()
    }
}

impl IntoIterator for &Study {
    type Item = FinishedTrial;
    type IntoIter = std::vec::IntoIter<FinishedTrial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
