//! spot_launch library
//!
//! Assembles the launch description for the Spot driver stack: the camera
//! image-publisher inclusion, the launch argument declarations, the driver
//! node, and the robot-state-publisher node carrying the expanded robot
//! description. The result is a plain ordered list of entities; starting
//! and supervising the processes is the launch runtime's job.

pub mod ament;
pub mod context;
pub mod error;
pub mod record;
pub mod xacro;

use ament::AmentIndex;
use context::LaunchContext;
use error::Result;
use record::{IncludeRecord, LaunchArgument, LaunchDescription, LaunchEntity, NodeRecord};
use std::collections::HashMap;

pub const DRIVER_PACKAGE: &str = "spot_driver";
pub const DRIVER_EXECUTABLE: &str = "spot_ros2";
pub const DESCRIPTION_PACKAGE: &str = "spot_description";
pub const STATE_PUBLISHER_PACKAGE: &str = "robot_state_publisher";
pub const STATE_PUBLISHER_EXECUTABLE: &str = "robot_state_publisher";

const TEMPLATE_RELATIVE_PATH: &str = "urdf/spot.urdf.xacro";
const IMAGE_PUBLISHERS_LAUNCH: &str = "launch/spot_image_publishers.launch.py";

const CONFIG_FILE: &str = "config_file";
const PUBLISH_RGB: &str = "publish_rgb";
const PUBLISH_DEPTH: &str = "publish_depth";
const PUBLISH_DEPTH_REGISTERED: &str = "publish_depth_registered";

/// The launch arguments this description declares, in declaration order.
pub fn declared_arguments() -> [LaunchArgument; 4] {
    [
        LaunchArgument::with_default(
            PUBLISH_RGB,
            "Start publishing all RGB channels on Spot cameras",
            "true",
        ),
        LaunchArgument::with_default(
            PUBLISH_DEPTH,
            "Start publishing all depth channels on Spot cameras",
            "true",
        ),
        LaunchArgument::with_default(
            PUBLISH_DEPTH_REGISTERED,
            "Start publishing all depth_registered channels on Spot cameras",
            "false",
        ),
        LaunchArgument::required(
            CONFIG_FILE,
            "Path to configuration file for the driver.",
        ),
    ]
}

/// Assemble the driver launch description.
///
/// A single linear pass: declare the arguments, expand the robot
/// description template, build the image-publisher inclusion and the two
/// node records, and return everything in fixed order. Any failure aborts
/// the whole assembly; nothing has been started yet at this point, so
/// there is no partial state to unwind.
pub fn assemble(
    index: &AmentIndex,
    overrides: HashMap<String, String>,
) -> Result<LaunchDescription> {
    let mut context = LaunchContext::new(overrides);

    let arguments = declared_arguments();
    for argument in &arguments {
        context.declare(argument);
    }

    let description_share = index.find_package_share(DESCRIPTION_PACKAGE)?;
    let template = description_share.join(TEMPLATE_RELATIVE_PATH);
    log::info!("Expanding robot description: {}", template.display());
    let robot_description = xacro::expand_file(&template)?;

    let publish_rgb = context.resolve_or(PUBLISH_RGB, "true");
    let publish_depth = context.resolve_or(PUBLISH_DEPTH, "true");
    let publish_depth_registered = context.resolve_or(PUBLISH_DEPTH_REGISTERED, "true");

    let driver_share = index.find_package_share(DRIVER_PACKAGE)?;
    let image_publishers = IncludeRecord {
        file: driver_share.join(IMAGE_PUBLISHERS_LAUNCH),
        args: vec![
            (PUBLISH_RGB.to_string(), publish_rgb),
            (PUBLISH_DEPTH.to_string(), publish_depth),
            (PUBLISH_DEPTH_REGISTERED.to_string(), publish_depth_registered),
        ],
    };

    let config_file = context.resolve(CONFIG_FILE)?;

    let driver = NodeRecord {
        package: DRIVER_PACKAGE.to_string(),
        executable: DRIVER_EXECUTABLE.to_string(),
        name: Some(DRIVER_EXECUTABLE.to_string()),
        output: "screen".to_string(),
        params: Vec::new(),
        params_files: vec![config_file],
    };

    let state_publisher = NodeRecord {
        package: STATE_PUBLISHER_PACKAGE.to_string(),
        executable: STATE_PUBLISHER_EXECUTABLE.to_string(),
        name: None,
        output: "screen".to_string(),
        params: vec![("robot_description".to_string(), robot_description)],
        params_files: Vec::new(),
    };

    let [publish_rgb_arg, publish_depth_arg, publish_depth_registered_arg, config_file_arg] =
        arguments;

    Ok(LaunchDescription::new(vec![
        LaunchEntity::Include(image_publishers),
        LaunchEntity::Argument(publish_rgb_arg),
        LaunchEntity::Argument(publish_depth_arg),
        LaunchEntity::Argument(publish_depth_registered_arg),
        LaunchEntity::Argument(config_file_arg),
        LaunchEntity::Node(driver),
        LaunchEntity::Node(state_publisher),
    ]))
}

/// Assemble against the packages visible in the current environment.
pub fn assemble_from_env(overrides: HashMap<String, String>) -> Result<LaunchDescription> {
    assemble(&AmentIndex::from_env(), overrides)
}
