use proptest::prelude::*;
use std::collections::BTreeMap;
use tempval::time::{from_ymd, from_ymd_hms};
use tempval::{
    Deserializer, Error, GeomPoint, Interpolation, Period, PeriodSet, STBox, TBox, TInstant,
    TInstantSet, TSequence, TSequenceSet, Temporal, TemporalDuration, TemporalValue, TimeDelta,
    TimePoint, TimestampSet,
};

#[test]
fn period_from_text_reports_bounds() {
    let period: Period = "[2012-01-01, 2012-04-01)".parse().unwrap();
    assert_eq!(period.lower(), from_ymd(2012, 1, 1).unwrap());
    assert_eq!(period.upper(), from_ymd(2012, 4, 1).unwrap());
    assert!(period.lower_inc());
    assert!(!period.upper_inc());
}

#[test]
fn int_instant_round_trips_through_text() {
    let instant: TInstant<i32> = "10@2012-11-01".parse().unwrap();
    assert_eq!(*instant.value(), 10);
    assert_eq!(instant.timestamp(), from_ymd(2012, 11, 1).unwrap());
    assert_eq!(instant.to_string(), "10@2012-11-01T00:00:00+0000");
}

#[test]
fn open_single_instant_sequence_shifts_by_a_day() {
    let sequence: TSequence<i32> = "[10@2012-11-01)".parse().unwrap();
    let shifted = sequence.shift(TimeDelta::hours(24)).unwrap();
    assert_eq!(shifted.to_string(), "[10@2012-11-02T00:00:00+0000)");
    assert_eq!(shifted.start_timestamp().unwrap(), from_ymd(2012, 11, 2).unwrap());
}

#[test]
fn instant_set_read_by_dispatch_keeps_its_shape() {
    let mut de = Deserializer::new("{10@2012-11-01}");
    let value = de.next_temporal::<i32>().unwrap();
    assert_eq!(value.duration(), TemporalDuration::InstantSet);
    assert!(value.as_instant_set().is_some());
    assert!(value.as_sequence().is_none());

    let sequence: TemporalValue<i32> = "[10@2012-11-01]".parse().unwrap();
    assert!(matches!(
        value.try_cmp(&sequence),
        Err(Error::UnsupportedComparison {
            lhs: TemporalDuration::InstantSet,
            rhs: TemporalDuration::Sequence,
        })
    ));
    assert_eq!(value.partial_cmp(&sequence), None);
}

#[test]
fn stepwise_float_sequence_set_propagates_interpolation() {
    let text = "Interp=Stepwise;{[10@2012-01-01], [20@2012-01-02, 10@2012-01-03]}";
    let set: TSequenceSet<f64> = text.parse().unwrap();
    assert_eq!(set.interpolation(), Interpolation::Stepwise);
    assert_eq!(set.num_sequences(), 2);
    for sequence in set.sequences() {
        assert_eq!(sequence.interpolation(), Interpolation::Stepwise);
    }
    assert_eq!(set.to_string().parse::<TSequenceSet<f64>>().unwrap(), set);
}

#[test]
fn tbox_text_is_byte_stable() {
    let text = "TBOX((1, 2012-01-01T00:00:00+0000), (2, 2012-01-02T00:00:00+0000))";
    let tbox: TBox = text.parse().unwrap();
    assert_eq!(tbox.to_string(), text);
}

#[test]
fn stbox_reads_what_it_writes() {
    let t0 = from_ymd(2012, 1, 1).unwrap();
    let t1 = from_ymd(2012, 1, 2).unwrap();
    let boxes = [
        STBox::from_xy(1.0, 2.0, 3.0, 4.0).unwrap(),
        STBox::from_xyz(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, true).unwrap().with_srid(4326),
        STBox::from_xyt(1.0, 2.0, t0, 3.0, 4.0, t1).unwrap(),
        STBox::from_times(t0, t1, false).unwrap(),
        STBox::empty(),
    ];
    for stbox in boxes {
        let text = stbox.to_string();
        assert_eq!(text.parse::<STBox>().unwrap(), stbox, "{text}");
    }
}

#[test]
fn time_literals_accept_offsets_and_fractions() {
    let instant: TInstant<f64> = "2.5@2012-11-01 10:15:30.25+02".parse().unwrap();
    let expected = from_ymd_hms(2012, 11, 1, 8, 15, 30).unwrap() + TimeDelta::milliseconds(250);
    assert_eq!(instant.timestamp(), expected);
    assert_eq!(instant.to_string(), "2.5@2012-11-01T08:15:30.250+0000");
}

#[test]
fn moving_point_over_time() {
    let text = "SRID=4326;[POINT (0 0)@2012-01-01, POINT (10 5)@2012-01-01 01:00)";
    let track: TSequence<GeomPoint> = text.parse().unwrap();
    assert_eq!(track.srid(), 4326);
    assert_eq!(track.interpolation(), Interpolation::Linear);
    assert_eq!(track.timespan(), TimeDelta::hours(1));
    assert_eq!(track.end_value().unwrap().x(), 10.0);
    assert!(track.instants().iter().all(|i| i.srid() == 4326));
    assert_eq!(
        track.to_string(),
        "SRID=4326;[POINT (0 0)@2012-01-01T00:00:00+0000, POINT (10 5)@2012-01-01T01:00:00+0000)"
    );
}

#[test]
fn time_sets_and_temporal_intersection() {
    let values: TInstantSet<i32> = "{1@2012-01-01, 2@2012-01-05, 3@2012-01-09}".parse().unwrap();
    let periods: PeriodSet =
        "{[2012-01-02, 2012-01-04], [2012-01-08, 2012-01-10)}".parse().unwrap();
    let stamps: TimestampSet = "{2012-01-03, 2012-01-06}".parse().unwrap();
    assert!(values.intersects_period_set(&periods));
    assert!(!values.intersects_timestamp_set(&stamps));
    assert_eq!(periods.timespan(), TimeDelta::days(4));
    assert_eq!(values.get_time().num_periods(), 3);
}

#[test]
fn text_values_keep_quotes() {
    let sequence: TSequence<String> = "[\"on\"@2012-01-01, \"off\"@2012-01-02]".parse().unwrap();
    assert_eq!(sequence.interpolation(), Interpolation::Stepwise);
    assert_eq!(sequence.value_n(1).unwrap(), "off");
    assert_eq!(
        sequence.to_string(),
        "[\"on\"@2012-01-01T00:00:00+0000, \"off\"@2012-01-02T00:00:00+0000]"
    );
    assert_eq!(
        "Interp=Linear;[\"on\"@2012-01-01]".parse::<TSequence<String>>(),
        Err(Error::DiscreteInterpolation)
    );

    let quoted = TInstant::new("say \"hi\"".to_string(), from_ymd(2012, 1, 1).unwrap());
    let text = quoted.to_string();
    assert_eq!(text, "\"say \"hi\"\"@2012-01-01T00:00:00+0000");
    assert_eq!(text.parse::<TInstant<String>>().unwrap(), quoted);
    let lone_quote = TInstant::new("\"".to_string(), from_ymd(2012, 1, 2).unwrap());
    let set = TInstantSet::new([quoted.clone(), lone_quote]).unwrap();
    assert_eq!(set.to_string().parse::<TInstantSet<String>>().unwrap(), set);
}

// ── properties ────────────────────────────────────────────────────────────

fn base() -> TimePoint {
    from_ymd(2012, 1, 1).unwrap()
}

/// Up to eight instants at distinct minutes.
fn instants() -> impl Strategy<Value = Vec<TInstant<i32>>> {
    prop::collection::btree_map(0i64..100_000, any::<i32>(), 1..8).prop_map(
        |m: BTreeMap<i64, i32>| {
            m.into_iter()
                .map(|(minute, v)| TInstant::new(v, base() + TimeDelta::minutes(minute)))
                .collect()
        },
    )
}

fn sequences() -> impl Strategy<Value = TSequence<i32>> {
    (instants(), any::<bool>(), any::<bool>()).prop_map(|(instants, li, ui)| {
        let single = instants.len() == 1;
        TSequence::new(instants, li || single, ui || single, Interpolation::Stepwise).unwrap()
    })
}

fn float_sequences() -> impl Strategy<Value = TSequence<f64>> {
    (
        prop::collection::btree_map(0i64..100_000, -1.0e6f64..1.0e6, 2..6),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(m, li, ui, stepwise)| {
            let interpolation = if stepwise {
                Interpolation::Stepwise
            } else {
                Interpolation::Linear
            };
            let instants = m
                .into_iter()
                .map(|(minute, v)| TInstant::new(v, base() + TimeDelta::minutes(minute)));
            TSequence::new(instants, li, ui, interpolation).unwrap()
        })
}

fn instant_sets() -> impl Strategy<Value = TInstantSet<i32>> {
    instants().prop_map(|v| TInstantSet::new(v).unwrap())
}

/// Members of different lengths, in no particular time order.
fn sequence_sets() -> impl Strategy<Value = TSequenceSet<i32>> {
    prop::collection::vec(sequences(), 1..4).prop_map(|v| TSequenceSet::new(v).unwrap())
}

/// Points on a centimetre grid, so the WKT text is exact.
fn point_instants() -> impl Strategy<Value = TInstant<GeomPoint>> {
    (
        -1_000_000i32..1_000_000,
        -1_000_000i32..1_000_000,
        prop_oneof![Just(0), Just(4326), Just(3857)],
        0i64..100_000,
    )
        .prop_map(|(x, y, srid, minute)| {
            let point = GeomPoint::new(f64::from(x) / 100.0, f64::from(y) / 100.0);
            TInstant::with_srid(point, base() + TimeDelta::minutes(minute), srid).unwrap()
        })
}

/// `[earliest, latest]` over every instant of the value.
fn closed_envelope<V: Temporal>(value: &V) -> Period {
    let instants = value.instants();
    let earliest = instants.iter().map(TInstant::timestamp).min().unwrap();
    let latest = instants.iter().map(TInstant::timestamp).max().unwrap();
    Period::closed(earliest, latest)
}

proptest! {
    #[test]
    fn prop_sequence_text_is_canonical(s in sequences()) {
        let text = s.to_string();
        let back: TSequence<i32> = text.parse().unwrap();
        prop_assert_eq!(&back, &s);
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn prop_float_sequence_text_is_canonical(s in float_sequences()) {
        let text = s.to_string();
        let back: TSequence<f64> = text.parse().unwrap();
        prop_assert_eq!(&back, &s);
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn prop_instant_set_text_is_canonical(s in instant_sets()) {
        let text = s.to_string();
        let back: TInstantSet<i32> = text.parse().unwrap();
        prop_assert_eq!(&back, &s);
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn prop_sequence_set_text_is_canonical(s in sequence_sets()) {
        let text = s.to_string();
        let back: TSequenceSet<i32> = text.parse().unwrap();
        prop_assert_eq!(&back, &s);
        prop_assert_eq!(back.to_string(), text.clone());
        let any: TemporalValue<i32> = text.parse().unwrap();
        prop_assert_eq!(any.as_sequence_set(), Some(&s));
    }

    #[test]
    fn prop_point_instant_text_is_canonical(i in point_instants()) {
        let text = i.to_string();
        let back: TInstant<GeomPoint> = text.parse().unwrap();
        prop_assert_eq!(&back, &i);
        prop_assert_eq!(back.srid(), i.srid());
        prop_assert_eq!(back.to_string(), text);
    }

    #[test]
    fn prop_sequence_ordering_is_total(a in sequences(), b in sequences()) {
        let lt = a < b;
        let eq = a == b;
        let gt = a > b;
        prop_assert_eq!(u8::from(lt) + u8::from(eq) + u8::from(gt), 1);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn prop_set_ordering_is_total(
        a in sequence_sets(),
        b in sequence_sets(),
        c in instant_sets(),
        d in instant_sets(),
    ) {
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a == b, a.cmp(&b).is_eq());
        prop_assert_eq!(c.cmp(&d), d.cmp(&c).reverse());
        prop_assert_eq!(c == d, c.cmp(&d).is_eq());
    }

    #[test]
    fn prop_shift_is_invertible(s in sequences(), minutes in -1_000_000i64..1_000_000) {
        let delta = TimeDelta::minutes(minutes);
        let shifted = s.shift(delta).unwrap();
        prop_assert_eq!(shifted.shift(-delta).unwrap(), s.clone());
        prop_assert_eq!(shifted.timespan(), s.timespan());
        prop_assert_eq!(shifted.period(), s.period().shift(delta).unwrap());
    }

    #[test]
    fn prop_shift_is_invertible_for_every_shape(
        set in sequence_sets(),
        instants in instant_sets(),
        point in point_instants(),
        minutes in -1_000_000i64..1_000_000,
    ) {
        let delta = TimeDelta::minutes(minutes);
        prop_assert_eq!(set.shift(delta).unwrap().shift(-delta).unwrap(), set.clone());
        prop_assert_eq!(set.shift(delta).unwrap().period(), set.period().shift(delta).unwrap());
        prop_assert_eq!(instants.shift(delta).unwrap().shift(-delta).unwrap(), instants.clone());
        let moved = point.shift(delta).unwrap();
        prop_assert_eq!(moved.srid(), point.srid());
        prop_assert_eq!(moved.shift(-delta).unwrap(), point);
    }

    #[test]
    fn prop_shift_never_panics(s in sequence_sets(), millis in -i64::MAX..i64::MAX) {
        let delta = TimeDelta::milliseconds(millis);
        if let Ok(shifted) = s.shift(delta) {
            prop_assert_eq!(shifted.num_instants(), s.num_instants());
        }
    }

    #[test]
    fn prop_period_is_closed_envelope(
        set in sequence_sets(),
        instants in instant_sets(),
        s in sequences(),
    ) {
        prop_assert_eq!(set.period(), closed_envelope(&set));
        prop_assert_eq!(instants.period(), closed_envelope(&instants));
        let envelope = closed_envelope(&s);
        prop_assert_eq!(s.period().lower(), envelope.lower());
        prop_assert_eq!(s.period().upper(), envelope.upper());
        for sequence in set.sequences() {
            prop_assert!(sequence.period().lower() >= set.period().lower());
            prop_assert!(sequence.period().upper() <= set.period().upper());
        }
    }

    #[test]
    fn prop_period_bounds_invariant(
        l in 0i64..1_000,
        u in 0i64..1_000,
        li in any::<bool>(),
        ui in any::<bool>(),
    ) {
        let lower = base() + TimeDelta::seconds(l);
        let upper = base() + TimeDelta::seconds(u);
        let valid = l < u || (l == u && li && ui);
        let period = Period::new(lower, upper, li, ui);
        prop_assert_eq!(period.is_ok(), valid);
        if let Ok(p) = period {
            prop_assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
        }
    }

    #[test]
    fn prop_instant_set_dedups(v in instants()) {
        let mut doubled = v.clone();
        doubled.extend(v.iter().cloned());
        let set = TInstantSet::new(doubled).unwrap();
        prop_assert_eq!(set.num_instants(), v.len());
        prop_assert_eq!(set.to_string().parse::<TInstantSet<i32>>().unwrap(), set);
    }
}

// ── serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
#[test]
fn serde_uses_canonical_text() {
    let period: Period = "[2012-01-01, 2012-01-02)".parse().unwrap();
    let json = serde_json::to_string(&period).unwrap();
    assert_eq!(json, "\"[2012-01-01T00:00:00+0000, 2012-01-02T00:00:00+0000)\"");
    assert_eq!(serde_json::from_str::<Period>(&json).unwrap(), period);

    let value: TemporalValue<f64> =
        "Interp=Stepwise;{[1@2012-01-01], [2@2012-01-02]}".parse().unwrap();
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(serde_json::from_str::<TemporalValue<f64>>(&json).unwrap(), value);

    let stbox = STBox::from_xy(1.0, 2.0, 3.0, 4.0).unwrap().with_srid(4326);
    let json = serde_json::to_string(&stbox).unwrap();
    assert_eq!(json, "\"SRID=4326;STBOX((1, 2), (3, 4))\"");
    assert_eq!(serde_json::from_str::<STBox>(&json).unwrap(), stbox);
}

#[cfg(feature = "serde")]
#[test]
fn serde_rejects_malformed_text() {
    assert!(serde_json::from_str::<TInstant<i32>>("\"10 2012-01-01\"").is_err());
    assert!(serde_json::from_str::<TBox>("\"TBOX((2,), (1,))\"").is_err());
}
