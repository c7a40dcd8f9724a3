//! event_study::design — flatten a local time series into `x`/`y`.
//!
//! Drops the `(offset, event_time)` keys and stacks the selected columns
//! into a dense design matrix. Column order is: optional intercept
//! (`"const"`), the requested predictors, then optional offset indicators
//! (`"offset[k]"`). With an intercept the lowest offset is the omitted
//! baseline so the design keeps full rank.
use crate::event_study::{
    errors::{EventStudyError, EventStudyResult},
    local_timeseries::LocalTimeSeries,
    options::DesignSpec,
};
use ndarray::{Array1, Array2};

/// Regression inputs built from a [`LocalTimeSeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    /// `len × names.len()` predictors.
    pub x: Array2<f64>,
    /// Response column, `NaN` preserved for the fitter to drop.
    pub y: Array1<f64>,
    /// Name of each column of `x`.
    pub names: Vec<String>,
}

pub(crate) fn build_design(local: &LocalTimeSeries, spec: &DesignSpec) -> EventStudyResult<Design> {
    let y = local.column(&spec.response)?.to_owned();
    let predictor_positions = spec
        .predictors
        .iter()
        .map(|name| local.column_position(name))
        .collect::<EventStudyResult<Vec<_>>>()?;

    let offsets = local.offsets();
    let dummy_offsets: &[i64] = match (spec.offset_dummies, spec.intercept) {
        (false, _) => &[],
        (true, true) => offsets.get(1..).unwrap_or(&[]),
        (true, false) => &offsets,
    };

    let mut names = Vec::new();
    if spec.intercept {
        names.push("const".to_string());
    }
    names.extend(spec.predictors.iter().cloned());
    names.extend(dummy_offsets.iter().map(|k| format!("offset[{k}]")));
    if names.is_empty() {
        return Err(EventStudyError::EmptyDesign);
    }

    let mut x = Array2::<f64>::zeros((local.len(), names.len()));
    let mut col = 0;
    if spec.intercept {
        x.column_mut(col).fill(1.0);
        col += 1;
    }
    for &position in &predictor_positions {
        x.column_mut(col).assign(&local.values().column(position));
        col += 1;
    }
    for &offset in dummy_offsets {
        let mut column = x.column_mut(col);
        for (row, key) in local.keys().iter().enumerate() {
            if key.offset == offset {
                column[row] = 1.0;
            }
        }
        col += 1;
    }

    Ok(Design { x, y, names })
}

#[cfg(test)]
mod tests {
    use crate::event_study::{DesignSpec, EventStudyError, build_local_timeseries};
    use crate::frame::{FrameError, TimeFrame, Timestamp};
    use chrono::{TimeZone, Utc};
    use ndarray::array;

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn local() -> crate::event_study::LocalTimeSeries {
        let grid = TimeFrame::from_columns(
            (1..=6).map(day).collect(),
            vec![
                ("ret", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                ("vol", vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]),
            ],
        )
        .unwrap();
        let events =
            TimeFrame::from_columns(vec![day(2), day(4)], vec![("flag", vec![1.0, 1.0])]).unwrap();
        build_local_timeseries(&events, &grid, &[0, 1], None, None).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Intercept, predictors and offset dummies are laid out in order with the
    // lowest offset as baseline.
    //
    // Expect
    // ------
    // - Columns ["const", "vol", "offset[1]"]; the dummy is 1 on offset-1 rows.
    fn design_stacks_intercept_predictors_and_dummies() {
        // Arrange
        let spec = DesignSpec::new("ret", vec!["vol"]).with_offset_dummies(true);

        // Act
        let design = local().design_matrix(&spec).unwrap();

        // Assert
        assert_eq!(design.names, vec!["const", "vol", "offset[1]"]);
        assert_eq!(design.y, array![2.0, 4.0, 3.0, 5.0]);
        assert_eq!(design.x.column(0).to_vec(), vec![1.0; 4]);
        assert_eq!(design.x.column(1).to_vec(), vec![0.2, 0.4, 0.3, 0.5]);
        assert_eq!(design.x.column(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn dummies_without_intercept_cover_every_offset() {
        let spec = DesignSpec::new("ret", Vec::new()).with_intercept(false).with_offset_dummies(true);
        let design = local().design_matrix(&spec).unwrap();
        assert_eq!(design.names, vec!["offset[0]", "offset[1]"]);
        assert_eq!(design.x.column(0).to_vec(), vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_or_unknown_designs_are_rejected() {
        let empty = DesignSpec::new("ret", Vec::new()).with_intercept(false);
        assert_eq!(local().design_matrix(&empty), Err(EventStudyError::EmptyDesign));

        let unknown = DesignSpec::new("ret", vec!["spread"]);
        assert!(matches!(
            local().design_matrix(&unknown),
            Err(EventStudyError::Frame(FrameError::UnknownColumn { .. }))
        ));
    }
}
