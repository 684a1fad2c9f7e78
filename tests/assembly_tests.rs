// End-to-end assembly against a synthetic install tree

use spot_launch::{
    assemble,
    ament::AmentIndex,
    error::AssemblyError,
    record::{LaunchDescription, LaunchEntity},
};
use std::{collections::HashMap, fs};
use tempfile::TempDir;

const TEMPLATE: &str = r#"<robot name="spot" xmlns:xacro="http://www.ros.org/wiki/xacro">
  <xacro:property name="body_length" value="1.1"/>
  <xacro:macro name="leg" params="side">
    <link name="${side}_upper_leg"/>
    <joint name="${side}_hip" type="revolute"/>
  </xacro:macro>
  <link name="body">
    <visual>
      <geometry>
        <box size="${body_length} 0.5 0.19"/>
      </geometry>
    </visual>
  </link>
  <xacro:leg side="front_left"/>
  <xacro:leg side="front_right"/>
  <xacro:leg side="rear_left"/>
  <xacro:leg side="rear_right"/>
</robot>"#;

/// Build a fake install prefix holding both packages and return an index
/// over it. The TempDir must stay alive for the duration of the test.
fn install_tree() -> (TempDir, AmentIndex) {
    let dir = tempfile::tempdir().unwrap();
    install_template(dir.path(), TEMPLATE);
    fs::create_dir_all(dir.path().join("share/spot_driver/launch")).unwrap();
    let index = AmentIndex::with_prefixes(vec![dir.path().to_path_buf()]);
    (dir, index)
}

fn install_template(prefix: &std::path::Path, template: &str) {
    let urdf_dir = prefix.join("share/spot_description/urdf");
    fs::create_dir_all(&urdf_dir).unwrap();
    fs::write(urdf_dir.join("spot.urdf.xacro"), template).unwrap();
}

fn launch_args(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn assemble_ok(index: &AmentIndex, pairs: &[(&str, &str)]) -> LaunchDescription {
    assemble(index, launch_args(pairs)).expect("assembly should succeed")
}

#[test]
fn test_entity_list_fixed_order() {
    let (_dir, index) = install_tree();
    let description = assemble_ok(&index, &[("config_file", "/etc/spot/driver.yaml")]);

    assert_eq!(description.entities.len(), 7);
    assert_eq!(description.includes().len(), 1);
    assert_eq!(description.arguments().len(), 4);
    assert_eq!(description.nodes().len(), 2);

    assert!(matches!(&description.entities[0], LaunchEntity::Include(_)));
    for (i, expected) in [
        "publish_rgb",
        "publish_depth",
        "publish_depth_registered",
        "config_file",
    ]
    .iter()
    .enumerate()
    {
        match &description.entities[i + 1] {
            LaunchEntity::Argument(arg) => assert_eq!(&arg.name, expected),
            other => panic!("Expected Argument at index {}, got {:?}", i + 1, other),
        }
    }
    match &description.entities[5] {
        LaunchEntity::Node(node) => assert_eq!(node.executable, "spot_ros2"),
        other => panic!("Expected driver node, got {:?}", other),
    }
    match &description.entities[6] {
        LaunchEntity::Node(node) => assert_eq!(node.executable, "robot_state_publisher"),
        other => panic!("Expected state publisher node, got {:?}", other),
    }
}

#[test]
fn test_include_forwards_flag_defaults() {
    let (_dir, index) = install_tree();
    let description = assemble_ok(&index, &[("config_file", "/etc/spot/driver.yaml")]);

    let include = description.includes()[0];
    assert!(include
        .file
        .ends_with("share/spot_driver/launch/spot_image_publishers.launch.py"));
    assert_eq!(
        include.args,
        vec![
            ("publish_rgb".to_string(), "true".to_string()),
            ("publish_depth".to_string(), "true".to_string()),
            ("publish_depth_registered".to_string(), "false".to_string()),
        ]
    );
}

#[test]
fn test_flag_override_leaves_others_at_defaults() {
    let (_dir, index) = install_tree();
    let description = assemble_ok(
        &index,
        &[
            ("config_file", "/etc/spot/driver.yaml"),
            ("publish_rgb", "false"),
        ],
    );

    let include = description.includes()[0];
    assert_eq!(
        include.args,
        vec![
            ("publish_rgb".to_string(), "false".to_string()),
            ("publish_depth".to_string(), "true".to_string()),
            ("publish_depth_registered".to_string(), "false".to_string()),
        ]
    );
}

#[test]
fn test_missing_config_file_builds_no_nodes() {
    let (_dir, index) = install_tree();

    let err = assemble(&index, HashMap::new()).unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::MissingArgument(name) if name == "config_file"
    ));
}

#[test]
fn test_driver_node_config_path_identity() {
    let (_dir, index) = install_tree();
    let config = "/var/lib/spot/config with spaces.yaml";
    let description = assemble_ok(&index, &[("config_file", config)]);

    let driver = description.nodes()[0];
    assert_eq!(driver.package, "spot_driver");
    assert_eq!(driver.name.as_deref(), Some("spot_ros2"));
    assert_eq!(driver.output, "screen");
    assert_eq!(driver.params_files, vec![config.to_string()]);
    assert!(driver.params.is_empty());
}

#[test]
fn test_state_publisher_carries_expanded_description() {
    let (_dir, index) = install_tree();
    let description = assemble_ok(&index, &[("config_file", "/etc/spot/driver.yaml")]);

    let state_publisher = description.nodes()[1];
    assert_eq!(state_publisher.package, "robot_state_publisher");
    assert!(state_publisher.name.is_none());
    assert!(state_publisher.params_files.is_empty());

    let (key, value) = &state_publisher.params[0];
    assert_eq!(key, "robot_description");
    assert!(!value.is_empty());
    // Macro-expanded, property-substituted, xacro markup gone
    assert!(value.contains("<robot name=\"spot\">"));
    assert!(value.contains("name=\"front_left_upper_leg\""));
    assert!(value.contains("name=\"rear_right_hip\""));
    assert!(value.contains("size=\"1.1 0.5 0.19\""));
    assert!(!value.contains("xacro:"));
}

#[test]
fn test_reassembly_is_idempotent() {
    let (_dir, index) = install_tree();
    let args = &[("config_file", "/etc/spot/driver.yaml")];

    let first = assemble_ok(&index, args);
    let second = assemble_ok(&index, args);
    assert_eq!(first.entities, second.entities);
}

#[test]
fn test_malformed_template_aborts_assembly() {
    let dir = tempfile::tempdir().unwrap();
    install_template(dir.path(), "<robot name=\"spot\"><link></robot>");
    fs::create_dir_all(dir.path().join("share/spot_driver/launch")).unwrap();
    let index = AmentIndex::with_prefixes(vec![dir.path().to_path_buf()]);

    let err = assemble(&index, launch_args(&[("config_file", "/etc/spot/driver.yaml")]))
        .unwrap_err();
    assert!(matches!(err, AssemblyError::TemplateExpansion(_)));
}

#[test]
fn test_missing_driver_package() {
    let dir = tempfile::tempdir().unwrap();
    install_template(dir.path(), TEMPLATE);
    let index = AmentIndex::with_prefixes(vec![dir.path().to_path_buf()]);

    let err = assemble(&index, launch_args(&[("config_file", "/etc/spot/driver.yaml")]))
        .unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::PackageNotFound(pkg) if pkg == "spot_driver"
    ));
}

#[test]
fn test_description_serializes_to_json() {
    let (_dir, index) = install_tree();
    let description = assemble_ok(&index, &[("config_file", "/etc/spot/driver.yaml")]);

    let json = description.to_json().unwrap();
    let back: LaunchDescription = serde_json::from_str(&json).unwrap();
    assert_eq!(back.entities, description.entities);
}
