use tempval::{
    Deserializer, GeomPoint, Interpolation, PeriodSet, STBox, TBox, TSequence, TSequenceSet,
    Temporal, TemporalValue, TimeDelta,
};

fn main() -> tempval::Result<()> {
    let speed: TSequence<f64> =
        "[12.5@2012-01-01 08:00, 30@2012-01-01 08:30, 0@2012-01-01 09:00]".parse()?;
    println!("speed: {speed}");
    println!("  interpolation: {}", speed.interpolation());
    println!("  duration: {} min", speed.timespan().num_minutes());
    println!("  range: {}..{}", speed.min_value()?, speed.max_value()?);

    let next_day = speed.shift(TimeDelta::days(1))?;
    println!("  next day: {next_day}");

    let trips: TSequenceSet<GeomPoint> = "SRID=4326;{\
         [POINT (2.17 41.38)@2012-01-01 08:00, POINT (2.19 41.40)@2012-01-01 08:20], \
         [POINT (2.19 41.40)@2012-01-01 18:00, POINT (2.17 41.38)@2012-01-01 18:25]}"
        .parse()?;
    println!("trips: {} sequences, SRID {}", trips.num_sequences(), trips.srid());
    println!("  time: {}", trips.get_time());

    let stepwise = trips.with_interp(Interpolation::Stepwise)?;
    println!("  stepwise: {stepwise}");

    let busy: PeriodSet =
        "{[2012-01-01 08:10, 2012-01-01 08:15], [2012-01-01 12:00, 2012-01-01 13:00]}".parse()?;
    println!("  moving while busy: {}", trips.intersects_period_set(&busy));

    let mut de = Deserializer::new("{1@2012-01-01, 2@2012-01-02} [3@2012-01-03]");
    while de.has_next() {
        let value: TemporalValue<i32> = de.next_temporal()?;
        println!("read {} {value}", value.duration());
        de.skip_whitespace();
    }

    let tbox = TBox::from_values(0.0, 30.0)?;
    let stbox = STBox::from_xy(2.17, 41.38, 2.19, 41.40)?.with_srid(4326);
    println!("{tbox}\n{stbox}");
    Ok(())
}
