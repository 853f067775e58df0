// src/components/camera_follow.rs

use serde::{Deserialize, Serialize};

use crate::ecs::component::Component;

/// これを持っているエンティティをカメラが追いかける (目印だけのコンポーネント)。🎥
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraFollowComponent;

impl Component for CameraFollowComponent {}
