use pivot_core::{
    check_project, Config, Editor, IdAllocator, InteractionMode, Project, Template, Vec2,
};

fn editor_with(project: Project) -> Editor {
    Editor::with_project(project, Config::default(), IdAllocator::with_seed("alias"))
}

#[test]
fn new_frame_is_independent_of_its_source() {
    let project = pivot_test_fixtures::projects::load("two_frames").unwrap();
    let mut ed = editor_with(project);
    ed.set_current_frame(0).unwrap();
    ed.add_frame();
    assert_eq!(ed.frame_count(), 3);
    assert_eq!(ed.current_frame, 2);

    let source = &ed.project.frames[1];
    let copy = &ed.project.frames[2];
    for (a, b) in source.figures.iter().zip(&copy.figures) {
        assert_eq!(a.pivots(), b.pivots());
        assert!(!std::ptr::eq(a.pivots().as_ptr(), b.pivots().as_ptr()));
        assert!(!std::ptr::eq(a.shapes.as_ptr(), b.shapes.as_ptr()));
    }

    let before = ed.project.frames[1].figures[0].pivot("s-end").unwrap().pos;
    ed.mode = InteractionMode::Rotate;
    ed.drag_pivot("s-end", Vec2::new(400.0, 400.0));
    assert_eq!(ed.project.frames[1].figures[0].pivot("s-end").unwrap().pos, before);
    assert_ne!(ed.current().figures[0].pivot("s-end").unwrap().pos, before);
    assert!(ed.check_integrity().is_empty());
}

#[test]
fn template_figures_get_fresh_ids_per_instance() {
    let mut ed = Editor::new("scratch", Config::default());
    let stick = ed.add_template(Template::SimpleStick);
    let circle = ed.add_template(Template::Circle);
    let first = ed.add_template(Template::Stickman);
    let second = ed.add_template(Template::Stickman);
    assert_eq!(ed.current().figures.len(), 4);
    assert!(check_project(&ed.project).is_empty());

    // Both "root" pivots are reachable on their own figure.
    let circle_root = ed.current().figure(&circle).unwrap().root().unwrap().id.clone();
    ed.drag_pivot(&circle_root, Vec2::new(0.0, 0.0));
    assert_eq!(ed.current().figure(&circle).unwrap().root().unwrap().pos, Vec2::ZERO);
    assert_eq!(
        ed.current().figure(&stick).unwrap().root().unwrap().pos,
        Vec2::new(400.0, 300.0)
    );

    let hip = ed.current().figure(&second).unwrap().root().unwrap().id.clone();
    ed.drag_pivot(&hip, Vec2::new(100.0, 100.0));
    assert_eq!(ed.current().figure(&second).unwrap().root().unwrap().pos, Vec2::new(100.0, 100.0));
    assert_eq!(
        ed.current().figure(&first).unwrap().root().unwrap().pos,
        Vec2::new(400.0, 350.0)
    );

    ed.add_frame();
    assert!(check_project(&ed.project).is_empty());
}

#[test]
fn deleting_current_frame_moves_selection_back() {
    let project = pivot_test_fixtures::projects::load("two_frames").unwrap();
    let mut ed = editor_with(project);
    ed.set_current_frame(1).unwrap();
    assert_eq!(ed.delete_frame(1), Ok(true));
    assert_eq!(ed.current_frame, 0);
    assert_eq!(ed.current().id, "k0");
}
