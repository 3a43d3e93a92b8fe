//! SalesChart - 期間を切り替えると系列を作り直す

use std::sync::Arc;

use crate::domain::chart::{SALES_JITTER, labels, sales_point};
use crate::domain::{ChartPeriod, SalesSeries};
use crate::ports::{Clock, RandomSource};

pub struct SalesChart {
    clock: Arc<dyn Clock>,
    rng: Arc<dyn RandomSource>,
    series: SalesSeries,
}

impl SalesChart {
    pub fn new(clock: Arc<dyn Clock>, rng: Arc<dyn RandomSource>) -> Self {
        let series = generate(clock.as_ref(), rng.as_ref(), ChartPeriod::default());
        Self { clock, rng, series }
    }

    pub fn series(&self) -> &SalesSeries {
        &self.series
    }

    pub fn set_period(&mut self, period: ChartPeriod) -> &SalesSeries {
        self.series = generate(self.clock.as_ref(), self.rng.as_ref(), period);
        &self.series
    }
}

fn generate(clock: &dyn Clock, rng: &dyn RandomSource, period: ChartPeriod) -> SalesSeries {
    let labels = labels(clock.now().date_naive(), period);
    let values = (0..labels.len())
        .map(|i| sales_point(i, rng.range_f64(-SALES_JITTER, SALES_JITTER)))
        .collect();
    SalesSeries {
        period,
        labels,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{SeededRandom, SequenceRandom};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()))
    }

    #[test]
    fn defaults_to_thirty_days() {
        let chart = SalesChart::new(clock(), Arc::new(SeededRandom::new(5)));
        let s = chart.series();
        assert_eq!(s.period, ChartPeriod::Month);
        assert_eq!(s.labels.len(), 30);
        assert_eq!(s.values.len(), 30);
        assert_eq!(s.labels.last().map(String::as_str), Some("Mar 2"));
    }

    #[rstest]
    #[case(ChartPeriod::Week, 7)]
    #[case(ChartPeriod::Quarter, 90)]
    fn switching_period_regenerates(#[case] period: ChartPeriod, #[case] len: usize) {
        let mut chart = SalesChart::new(clock(), Arc::new(SeededRandom::new(5)));
        let s = chart.set_period(period);
        assert_eq!(s.period, period);
        assert_eq!(s.values.len(), len);
        assert!(s.values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn midpoint_variation_gives_pure_trend() {
        let chart = SalesChart::new(clock(), Arc::new(SequenceRandom::constant(0.5)));
        let values = &chart.series().values;
        assert_eq!(values[0], 1000.0);
        assert_eq!(values[29], 1290.0);
    }
}
