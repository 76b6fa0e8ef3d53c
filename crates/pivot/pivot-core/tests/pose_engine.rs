use pivot_core::pose::{flip_figure, rotation_center};
use pivot_core::{apply_drag, apply_drag_with, Figure, InteractionMode, PoseOptions, StretchPolicy, Vec2};

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "left={a} right={b}");
}

fn fixture(name: &str) -> Figure {
    pivot_test_fixtures::figures::load(name).expect("load figure fixture")
}

fn pos(f: &Figure, id: &str) -> Vec2 {
    f.pivot(id).unwrap_or_else(|| panic!("pivot {id}")).pos
}

#[test]
fn flip_twice_restores_positions() {
    for name in ["stickman", "hand_chain"] {
        let f = fixture(name);
        let once = flip_figure(&f);
        let twice = flip_figure(&once);
        for p in f.pivots() {
            let back = pos(&twice, &p.id);
            approx(back.x, p.pos.x);
            approx(back.y, p.pos.y);
        }
    }
}

#[test]
fn flip_mode_ignores_clicked_pivot() {
    let f = fixture("stickman");
    let from_hand = apply_drag(&f, "l-hand", Vec2::new(9.0, 9.0), InteractionMode::Flip);
    let from_hip = apply_drag(&f, "hip", Vec2::ZERO, InteractionMode::Flip);
    assert_eq!(from_hand, from_hip);
    approx(pos(&from_hand, "l-hand").x, 456.0);
    approx(pos(&from_hand, "hip").x, 400.0);
}

#[test]
fn root_drag_translates_everything() {
    let f = fixture("stickman");
    let target = Vec2::new(430.0, 310.0);
    let (dx, dy) = (30.0, -40.0);
    for mode in [InteractionMode::Rotate, InteractionMode::Stretch] {
        let g = apply_drag(&f, "hip", target, mode);
        assert_eq!(pos(&g, "hip"), target);
        for p in f.pivots() {
            let moved = pos(&g, &p.id);
            approx(moved.x - p.pos.x, dx);
            approx(moved.y - p.pos.y, dy);
        }
    }
}

#[test]
fn rotate_preserves_parent_distances() {
    let f = fixture("stickman");
    let targets = [
        Vec2::new(0.0, 0.0),
        Vec2::new(500.0, 100.0),
        Vec2::new(380.0, 420.0),
    ];
    for p in f.pivots() {
        let Some(parent) = f.parent(&p.id) else {
            continue;
        };
        for target in targets {
            let g = apply_drag(&f, &p.id, target, InteractionMode::Rotate);
            approx(
                pos(&g, &p.id).distance(pos(&g, &parent.id)),
                p.pos.distance(parent.pos),
            );
            // Every bone keeps its length.
            for q in g.pivots() {
                if let Some(qp) = g.parent(&q.id) {
                    approx(
                        q.pos.distance(qp.pos),
                        pos(&f, &q.id).distance(pos(&f, &qp.id)),
                    );
                }
            }
        }
    }
}

#[test]
fn rotate_points_dragged_pivot_at_target() {
    let f = fixture("stickman");
    let g = apply_drag(&f, "l-elbow", Vec2::new(300.0, 270.0), InteractionMode::Rotate);
    let elbow = pos(&g, "l-elbow");
    let shoulder = pos(&g, "shoulder");
    approx(elbow.y, shoulder.y);
    assert!(elbow.x < shoulder.x);
    // The forearm swings with the elbow and ends up level with it.
    approx(pos(&g, "l-hand").y, shoulder.y);
    assert!(pos(&g, "l-hand").x < elbow.x);
    assert_eq!(pos(&g, "r-elbow"), pos(&f, "r-elbow"));
}

#[test]
fn fixed_chain_walks_to_nearest_joint() {
    let f = fixture("hand_chain");
    let rc = rotation_center(&f, "tip").unwrap();
    assert_eq!(rc.center, "wrist");
    assert_eq!(rc.group_root.as_deref(), Some("palm"));

    let wrist = pos(&f, "wrist");
    let g = apply_drag(&f, "tip", Vec2::new(200.0, 100.0), InteractionMode::Rotate);

    // Quarter turn about the wrist for the whole rigid group and its fixed sibling.
    for (id, dx, dy) in [("palm", 0.0, 20.0), ("knuckle", 0.0, 40.0), ("tip", 0.0, 60.0), ("thumb", -20.0, 10.0)] {
        let p = pos(&g, id);
        approx(p.x - wrist.x, dx);
        approx(p.y - wrist.y, dy);
    }
    for id in ["shoulder", "elbow", "wrist"] {
        assert_eq!(pos(&g, id), pos(&f, id));
    }
}

#[test]
fn fixed_pivot_under_joint_swings_with_fixed_siblings() {
    let f = fixture("hand_chain");
    let rc = rotation_center(&f, "palm").unwrap();
    assert_eq!(rc.center, "wrist");
    assert_eq!(rc.group_root, None);

    let g = apply_drag(&f, "palm", Vec2::new(200.0, -50.0), InteractionMode::Rotate);
    approx(pos(&g, "palm").x, 200.0);
    approx(pos(&g, "palm").y, -20.0);
    approx(pos(&g, "tip").y, -60.0);
    approx(pos(&g, "thumb").x, 220.0);
    approx(pos(&g, "thumb").y, -10.0);
}

#[test]
fn joint_drag_carries_fixed_siblings_only() {
    let f = fixture("knee_siblings");
    let rc = rotation_center(&f, "foot").unwrap();
    assert_eq!(rc.center, "knee");
    assert_eq!(rc.group_root, None);

    // Quarter turn of the foot about the knee.
    let g = apply_drag(&f, "foot", Vec2::new(100.0, 100.0), InteractionMode::Rotate);
    approx(pos(&g, "foot").x, 100.0);
    approx(pos(&g, "foot").y, 100.0);
    // The fixed pad turns by the same angle about the knee.
    approx(pos(&g, "pad").x, 50.0);
    approx(pos(&g, "pad").y, 0.0);
    approx(pos(&g, "pad").distance(pos(&g, "knee")), 50.0);
    // Joint siblings and the rest of the leg stay put.
    for id in ["spur", "knee", "hip"] {
        assert_eq!(pos(&g, id), pos(&f, id));
    }
}

#[test]
fn stretch_policy_controls_descendants() {
    let f = fixture("stickman");
    let target = Vec2::new(360.0, 300.0);
    let bone_only = apply_drag(&f, "l-elbow", target, InteractionMode::Stretch);
    assert_eq!(pos(&bone_only, "l-elbow"), target);
    assert_eq!(pos(&bone_only, "l-hand"), pos(&f, "l-hand"));

    let opts = PoseOptions {
        stretch: StretchPolicy::CarryDescendants,
        ..PoseOptions::default()
    };
    let carried = apply_drag_with(&f, "l-elbow", target, InteractionMode::Stretch, &opts);
    approx(pos(&carried, "l-hand").x, 344.0 - 12.0);
    approx(pos(&carried, "l-hand").y, 326.0 + 2.0);
}

#[test]
fn drags_never_touch_the_input() {
    let f = fixture("hand_chain");
    let snapshot = f.clone();
    for mode in [InteractionMode::Rotate, InteractionMode::Stretch, InteractionMode::Flip] {
        let g = apply_drag(&f, "knuckle", Vec2::new(1.0, 2.0), mode);
        assert!(!std::ptr::eq(f.pivots().as_ptr(), g.pivots().as_ptr()));
    }
    assert_eq!(f, snapshot);
}
