use geoproj::{Angle, GeoError, GeoPoint, Projection, ProjectionConfig, ProjectionKind};

#[test]
fn test_config_json_round_trip() {
    let mut p = Projection::natural_earth();
    p.set_scale(220.0)
        .unwrap()
        .set_translate(100.0, 50.0)
        .unwrap()
        .set_rotate([Angle::Degrees(-40.0), Angle::ZERO, Angle::Radians(0.25)])
        .unwrap()
        .set_clip_angle(Some(Angle::Degrees(80.0)))
        .unwrap()
        .set_angle_post_clip(Angle::Degrees(15.0))
        .unwrap()
        .set_reflect_y(true);

    let json = serde_json::to_string(&p.config()).unwrap();
    let config: ProjectionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, p.config());

    let q = Projection::from_config(&config).unwrap();
    assert_eq!(q.kind(), Some(ProjectionKind::NaturalEarth));
    for (lon, lat) in [(0.0, 0.0), (-30.0, 45.0), (60.0, -20.0)] {
        let point = GeoPoint::from_degrees(lon, lat);
        assert_eq!(p.project(point), q.project(point));
    }
}

#[test]
fn test_config_field_names() {
    let json = r#"{
        "kind": "gnomonic",
        "translate": [0.0, 0.0],
        "center": {"lon": {"degrees": 10.0}, "lat": {"degrees": 20.0}},
        "precision": 0.0
    }"#;
    let config: ProjectionConfig = serde_json::from_str(json).unwrap();
    let p = Projection::from_config(&config).unwrap();
    assert_eq!(p.translate(), (0.0, 0.0));
    assert_eq!(p.precision(), 0.0);
    assert_eq!(p.center(), GeoPoint::from_degrees(10.0, 20.0));
    // Family defaults fill in the rest.
    assert_eq!(p.clip_angle(), Some(Angle::Degrees(60.0)));
}

#[test]
fn test_unknown_kind_is_rejected() {
    assert!(serde_json::from_str::<ProjectionConfig>(r#"{"kind":"mercator"}"#).is_err());
    assert_eq!(
        "mercator".parse::<ProjectionKind>().unwrap_err(),
        GeoError::UnknownProjection("mercator".into())
    );
}

#[test]
fn test_empty_config_serializes_empty() {
    assert_eq!(serde_json::to_string(&ProjectionConfig::default()).unwrap(), "{}");
}
